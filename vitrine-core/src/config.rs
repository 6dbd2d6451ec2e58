/// Scene configuration
///
/// Every value has a built-in default, so a configuration file only needs to
/// name the fields it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub animation: AnimationConfig,
}

/// Orbit camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial eye position. Yaw, pitch and radius are derived from it.
    pub eye: [f32; 3],
    /// Point the camera orbits around.
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Radians of yaw/pitch per pixel of pointer drag.
    pub drag_sensitivity: f32,
    /// Fractional radius change per unit of wheel delta.
    pub zoom_sensitivity: f32,
    /// Exclusive lower bound of the orbit radius.
    pub min_radius: f32,
    /// Exclusive upper bound of the orbit radius.
    pub max_radius: f32,
    /// Pitch is clamped to plus or minus this many degrees.
    pub pitch_limit_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 2.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            drag_sensitivity: 0.005,
            zoom_sensitivity: 0.001,
            min_radius: 2.0,
            max_radius: 10.0,
            pitch_limit_degrees: 60.0,
        }
    }
}

/// Point light and framebuffer clear settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub light_position: [f32; 3],
    pub clear_color: [f32; 4],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            light_position: [5.0, 5.0, 5.0],
            clear_color: [0.9, 0.9, 0.9, 1.0],
        }
    }
}

/// Shelving animation for the perfume bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: f64,
    pub start: KeyframeConfig,
    pub end: KeyframeConfig,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 5000.0,
            start: KeyframeConfig {
                position: [0.5, 0.0, 2.0],
                rotation: 0.0,
            },
            end: KeyframeConfig {
                position: [0.5, 0.16, -2.0],
                rotation: std::f32::consts::TAU,
            },
        }
    }
}

/// A position and yaw pair, in world units and radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyframeConfig {
    pub position: [f32; 3],
    pub rotation: f32,
}

impl SceneConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize this configuration to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let config = SceneConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = SceneConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SceneConfig::from_toml_str(
            r#"
            [camera]
            max_radius = 20.0

            [animation]
            duration_ms = 1500.0
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.max_radius, 20.0);
        assert_eq!(config.camera.min_radius, 2.0);
        assert_eq!(config.camera.eye, [0.0, 2.0, 5.0]);
        assert_eq!(config.animation.duration_ms, 1500.0);
        assert_eq!(config.animation.end.position, [0.5, 0.16, -2.0]);
        assert_eq!(config.lighting, LightingConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(SceneConfig::from_toml_str("").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let err = SceneConfig::from_toml_str("[camera\nfov_degrees = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SceneConfig::load("/nonexistent/vitrine.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
