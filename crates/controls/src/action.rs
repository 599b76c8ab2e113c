use cubefield_common::Rgb;
use serde::{Deserialize, Serialize};

/// A one-shot edit triggered from the control panel.
///
/// Plain per-frame parameters (speeds, toggles) are written straight into
/// [`ControlParams`](crate::ControlParams); these actions mutate the scene
/// immediately instead of waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Spawn one batch of boxes now, capped at the ceiling.
    AddCubes,
    /// Log every scene object with its transform.
    OutputObjects,
    /// Move the camera back to its initial position.
    ResetCamera,
    /// Reset parameters and camera, and destroy every box.
    ResetAll,
    /// Rescale box x/z positions to a new width factor.
    SetExpandWidth(f32),
    /// Rescale box y positions to a new height factor.
    SetExpandHeight(f32),
    SetAmbientColor(Rgb),
    SetSpotLightColor(Rgb),
}

/// How an expand factor edit is turned into a position rescale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Multiply by `new / last`: the applied expansion always equals the
    /// panel value.
    #[default]
    Ratio,
    /// Multiply by `new` when it is larger than the last applied factor,
    /// otherwise divide by `new`.
    Relative,
}

/// Errors from control edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}
