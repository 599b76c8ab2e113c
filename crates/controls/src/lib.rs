//! Control panel model: the live parameter record and the one-shot actions
//! the panel can trigger.
//!
//! # Invariants
//! - Parameters are last-write-wins and read fresh every frame.
//! - Per-frame parameters are plain fields; edits that mutate the scene
//!   immediately go through [`ControlAction`].

pub mod action;
pub mod params;

pub use action::{ControlAction, ControlError, ScaleMode};
pub use params::ControlParams;
