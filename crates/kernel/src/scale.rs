use cubefield_controls::params::{MIN_EXPAND, check_expand};
use cubefield_controls::{ControlError, ScaleMode};
use glam::Vec3;

use crate::scene::{CubeBox, clamp_position};

/// Which position axes an expand factor acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleAxis {
    /// x and z.
    Width,
    /// y.
    Height,
}

impl ScaleAxis {
    fn mask(self) -> Vec3 {
        match self {
            Self::Width => Vec3::new(1.0, 0.0, 1.0),
            Self::Height => Vec3::new(0.0, 1.0, 0.0),
        }
    }

    fn param_name(self) -> &'static str {
        match self {
            Self::Width => "expand_width",
            Self::Height => "expand_height",
        }
    }
}

/// Stateful rescaling of box positions, driven by expand-factor edits.
#[derive(Debug, Clone)]
pub struct ScaleController {
    axis: ScaleAxis,
    mode: ScaleMode,
    last_applied: f32,
}

impl ScaleController {
    /// `initial` is the factor boxes are considered to already carry, i.e.
    /// the panel's starting value. Anything below [`MIN_EXPAND`] starts at it.
    pub fn new(axis: ScaleAxis, mode: ScaleMode, initial: f32) -> Self {
        Self {
            axis,
            mode,
            last_applied: initial.max(MIN_EXPAND),
        }
    }

    pub fn last_applied(&self) -> f32 {
        self.last_applied
    }

    /// Multiplier that a new factor applies to positions, given the last
    /// applied factor.
    pub fn multiplier(&self, factor: f32) -> f32 {
        match self.mode {
            ScaleMode::Ratio => factor / self.last_applied,
            ScaleMode::Relative => {
                if factor > self.last_applied {
                    factor
                } else {
                    1.0 / factor
                }
            }
        }
    }

    /// Rescale every box for a new factor and remember it.
    /// Returns the multiplier that was applied.
    pub fn apply(&mut self, boxes: &mut [CubeBox], factor: f32) -> Result<f32, ControlError> {
        let factor = check_expand(self.axis.param_name(), factor)?;
        let m = self.multiplier(factor);
        let mask = self.axis.mask();
        let scale = Vec3::ONE + mask * (m - 1.0);
        for b in boxes.iter_mut() {
            b.transform.position = clamp_position(b.transform.position * scale);
        }
        tracing::debug!(
            axis = ?self.axis,
            mode = ?self.mode,
            from = self.last_applied,
            to = factor,
            multiplier = m,
            "rescaled boxes"
        );
        self.last_applied = factor;
        Ok(m)
    }
}
