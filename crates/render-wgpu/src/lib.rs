//! wgpu render backend for the cube field.
//!
//! Draws every box as a lit, instanced unit cube, the ground plane as a flat
//! box, and the axis / spot-light helpers as lines. Lighting follows scene
//! membership: removed lights contribute nothing.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - Frame geometry is rebuilt from the scene every frame.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
