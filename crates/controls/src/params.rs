use std::ops::RangeInclusive;

use cubefield_common::Rgb;
use serde::{Deserialize, Serialize};

use crate::action::ControlError;

/// Slider range for the per-frame rotation speed (radians per frame).
pub const ROTATION_SPEED_RANGE: RangeInclusive<f32> = 0.0..=0.5;
/// Slider range for the wave frequency (phase advance per frame).
pub const WAVE_FREQUENCY_RANGE: RangeInclusive<f32> = 0.0..=0.05;
/// Smallest accepted expand factor.
pub const MIN_EXPAND: f32 = 1.0;
/// Rotation speed applied by a full reset.
pub const RESET_ROTATION_SPEED: f32 = 0.01;

pub const DEFAULT_AMBIENT_COLOR: Rgb = Rgb(0x0c0c0c);
pub const DEFAULT_SPOT_LIGHT_COLOR: Rgb = Rgb(0xffffff);

/// The live-editable parameter record behind the control panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlParams {
    /// Radians added to each box's x and y rotation per frame.
    pub rotation_speed: f32,
    /// Phase advance per frame for the vertical jitter. Zero disables jitter.
    pub wave_frequency: f32,
    pub expand_width: f32,
    pub expand_height: f32,
    pub ambient_light_on: bool,
    pub spot_light_on: bool,
    pub ambient_color: Rgb,
    pub spot_light_color: Rgb,
    pub show_axes: bool,
    pub show_plane: bool,
    pub show_spot_light_helper: bool,
    pub rotate_camera: bool,
    pub exploding: bool,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            rotation_speed: 0.0,
            wave_frequency: 0.025,
            expand_width: 1.0,
            expand_height: 1.0,
            ambient_light_on: true,
            spot_light_on: false,
            ambient_color: DEFAULT_AMBIENT_COLOR,
            spot_light_color: DEFAULT_SPOT_LIGHT_COLOR,
            show_axes: false,
            show_plane: true,
            show_spot_light_helper: false,
            rotate_camera: true,
            exploding: false,
        }
    }
}

impl ControlParams {
    /// Parameter changes made by the panel's "Reset All" action.
    pub fn reset(&mut self) {
        self.rotation_speed = RESET_ROTATION_SPEED;
        self.wave_frequency = 0.0;
        self.show_axes = false;
        self.show_plane = false;
    }

    /// Check every ranged parameter.
    pub fn validate(&self) -> Result<(), ControlError> {
        check_range("rotation_speed", self.rotation_speed, &ROTATION_SPEED_RANGE)?;
        check_range("wave_frequency", self.wave_frequency, &WAVE_FREQUENCY_RANGE)?;
        check_expand("expand_width", self.expand_width)?;
        check_expand("expand_height", self.expand_height)?;
        Ok(())
    }
}

/// Reject non-finite values and anything below [`MIN_EXPAND`].
pub fn check_expand(name: &'static str, value: f32) -> Result<f32, ControlError> {
    check_range(name, value, &(MIN_EXPAND..=f32::MAX))
}

fn check_range(
    name: &'static str,
    value: f32,
    range: &RangeInclusive<f32>,
) -> Result<f32, ControlError> {
    if value.is_finite() && range.contains(&value) {
        Ok(value)
    } else {
        Err(ControlError::OutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel() {
        let p = ControlParams::default();
        assert_eq!(p.rotation_speed, 0.0);
        assert_eq!(p.wave_frequency, 0.025);
        assert_eq!(p.expand_width, 1.0);
        assert!(p.ambient_light_on);
        assert!(!p.spot_light_on);
        assert!(p.show_plane);
        assert!(p.rotate_camera);
        assert!(!p.exploding);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn reset_sets_fixed_values() {
        let mut p = ControlParams {
            rotation_speed: 0.3,
            wave_frequency: 0.04,
            show_axes: true,
            show_plane: true,
            exploding: true,
            ..ControlParams::default()
        };
        p.reset();
        assert_eq!(p.rotation_speed, RESET_ROTATION_SPEED);
        assert_eq!(p.wave_frequency, 0.0);
        assert!(!p.show_axes);
        assert!(!p.show_plane);
        // Reset leaves the explode toggle to the user.
        assert!(p.exploding);
    }

    #[test]
    fn expand_below_one_rejected() {
        assert!(check_expand("expand_width", 0.5).is_err());
        assert!(check_expand("expand_width", f32::NAN).is_err());
        assert!(check_expand("expand_width", f32::INFINITY).is_err());
        assert_eq!(check_expand("expand_width", 1.25).unwrap(), 1.25);
    }

    #[test]
    fn validate_reports_field_name() {
        let p = ControlParams {
            rotation_speed: 2.0,
            ..ControlParams::default()
        };
        match p.validate() {
            Err(ControlError::OutOfRange { name, .. }) => assert_eq!(name, "rotation_speed"),
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let p: ControlParams =
            serde_yaml::from_str("rotation_speed: 0.2\nambient_color: \"#112233\"\n").unwrap();
        assert_eq!(p.rotation_speed, 0.2);
        assert_eq!(p.ambient_color, Rgb(0x112233));
        assert_eq!(p.wave_frequency, 0.025);
    }
}
