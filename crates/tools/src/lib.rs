//! Developer tooling: scene inspector, object listing, frame timing.
//!
//! # Invariants
//! - Tools only read the scene; nothing here mutates it.

mod frame_timer;
mod inspector;

pub use frame_timer::FrameTimer;
pub use inspector::{ObjectInfo, SceneInspector, SceneSummary};
