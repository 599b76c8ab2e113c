//! Shared types for the cube field workspace.

mod color;
mod types;

pub use color::{ColorParseError, Rgb};
pub use types::{BoxId, Transform};
