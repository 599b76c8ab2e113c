//! Cube field kernel: scene state and everything that mutates it.
//!
//! # Invariants
//! - Boxes live in a dedicated registry; singleton members (plane, lights,
//!   helpers) are never animated.
//! - The box count only grows toward the ceiling, except on a full reset.
//! - All state is owned by [`CubeField`]; there are no globals.

pub mod animator;
pub mod camera;
pub mod config;
pub mod field;
pub mod scale;
pub mod scene;
pub mod spawner;

pub use animator::Animator;
pub use camera::OrbitCamera;
pub use config::{ConfigError, FieldConfig, PlaneConfig, SpawnConfig};
pub use field::{ActionOutcome, CubeField, FrameReport};
pub use scale::{ScaleAxis, ScaleController};
pub use scene::{CubeBox, LightRig, PointLight, SceneEvent, SceneMember, SceneState};
pub use spawner::{Particle, Spawner};
