use std::path::Path;

use cubefield_controls::{ControlError, ControlParams, ScaleMode};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a field configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid control parameters: {0}")]
    Controls(#[from] ControlError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    pub width: f32,
    /// Extent along z.
    pub height: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
        }
    }
}

impl PlaneConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Box count the spawner fills up to.
    pub ceiling: usize,
    pub batch_size: usize,
    /// Batches the frame loop may run per frame. The default refills an
    /// empty field in a single frame.
    pub batches_per_frame: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            ceiling: 1000,
            batch_size: 100,
            batches_per_frame: 10,
        }
    }
}

/// Everything needed to build a [`CubeField`](crate::CubeField).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub plane: PlaneConfig,
    pub spawn: SpawnConfig,
    /// RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub scale_mode: ScaleMode,
    /// Initial control panel values.
    pub controls: ControlParams,
}

impl FieldConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(path = %path.display(), "loaded field config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.plane;
        if !(p.width.is_finite() && p.width > 0.0 && p.height.is_finite() && p.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "plane must have positive size, got {}x{}",
                p.width, p.height
            )));
        }
        if self.spawn.batch_size == 0 {
            return Err(ConfigError::Invalid("spawn.batch_size must be > 0".into()));
        }
        if self.spawn.batches_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "spawn.batches_per_frame must be > 0".into(),
            ));
        }
        self.controls.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = FieldConfig::default();
        assert_eq!(c.plane.size(), Vec2::new(600.0, 400.0));
        assert_eq!(c.spawn.ceiling, 1000);
        assert_eq!(c.spawn.batch_size, 100);
        assert_eq!(c.scale_mode, ScaleMode::Ratio);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml() {
        let c = FieldConfig::from_yaml(
            "seed: 7\nscale_mode: relative\nspawn:\n  batches_per_frame: 1\ncontrols:\n  exploding: true\n",
        )
        .unwrap();
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.scale_mode, ScaleMode::Relative);
        assert_eq!(c.spawn.batches_per_frame, 1);
        assert_eq!(c.spawn.ceiling, 1000);
        assert!(c.controls.exploding);
    }

    #[test]
    fn rejects_bad_plane() {
        let err = FieldConfig::from_yaml("plane:\n  width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_batches_per_frame() {
        let err = FieldConfig::from_yaml("seed: 1\nspawn:\n  batches_per_frame: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_controls() {
        let err = FieldConfig::from_yaml("controls:\n  expand_width: 0.2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Controls(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = FieldConfig::from_yaml("plane: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "plane:\n  width: 300\n  height: 200").unwrap();
        let c = FieldConfig::load(file.path()).unwrap();
        assert_eq!(c.plane.size(), Vec2::new(300.0, 200.0));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FieldConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
