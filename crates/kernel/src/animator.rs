use cubefield_controls::ControlParams;
use glam::Vec3;
use rand::Rng;

use crate::scene::{CubeBox, clamp_position};

/// Rotation added on every axis per explosion tick, in radians.
pub const EXPLODE_ROTATION_STEP: f32 = 1.0;
/// Position multiplier per explosion tick.
pub const EXPLODE_GROWTH: f32 = 1.01;

/// Per-frame box animation.
///
/// Holds the wave phase, which advances by the wave frequency every frame
/// whether or not the field is exploding.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    phase: f32,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance one frame. While exploding, boxes only explode; ordinary
    /// rotation and jitter resume once the flag is cleared.
    /// Returns true if this was an explosion tick.
    pub fn step<R: Rng>(
        &mut self,
        boxes: &mut [CubeBox],
        params: &ControlParams,
        rng: &mut R,
    ) -> bool {
        self.phase += params.wave_frequency;

        if params.exploding {
            for b in boxes.iter_mut() {
                explode(b);
            }
            return true;
        }

        let wave = params.wave_frequency > 0.0;
        let sin_phase = self.phase.sin();
        for b in boxes.iter_mut() {
            rotate(b, params.rotation_speed);
            if wave {
                b.transform.position.y += rng.random::<f32>() * sin_phase;
            }
        }
        false
    }
}

/// One explosion tick: spin every axis and push the box outward.
pub fn explode(b: &mut CubeBox) {
    b.transform.rotation += Vec3::splat(EXPLODE_ROTATION_STEP);
    b.transform.position = clamp_position(b.transform.position * EXPLODE_GROWTH);
}

/// Ordinary spin on the x and y axes.
pub fn rotate(b: &mut CubeBox, speed: f32) {
    b.transform.rotation.x += speed;
    b.transform.rotation.y += speed;
}
