//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate scene state.
//! - Render output derives only from the scene and the view.
//!
//! The GPU backend lives in `cubefield-render-wgpu`; the text renderer here
//! backs the headless CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
