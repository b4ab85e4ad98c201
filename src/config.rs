use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Controller configuration (TOML)
// ---------------------------------------------------------------------------

/// Full controller tuning. Every section and field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
    pub hold: HoldConfig,
    pub body: BodyConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub wheel_force: f64,       // N per unit scroll
    pub turn_force: f64,        // N·m per unit scroll
    pub max_speed: f64,         // m/s, forward pushes suppressed above this
    pub max_turn_speed: f64,    // rad/s, turn pushes suppressed at or above this
    pub pulse_threshold: u32,   // accepted pushes per movement pulse
    pub scroll_deadzone: f64,   // |scroll| below this is ignored
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            wheel_force: 200.0,
            turn_force: 5.0,
            max_speed: 5.0,
            max_turn_speed: 2.0,
            pulse_threshold: 6,
            scroll_deadzone: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub sensitivity: f64,       // deg per unit look per second
    pub min_vertical: f64,      // deg
    pub max_vertical: f64,      // deg
    pub max_horizontal: f64,    // deg, yaw offset limited to ±this
    pub follow_smooth: f64,     // 1/s
    pub offset: [f64; 3],       // m, from vehicle origin
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 10.0,
            min_vertical: -30.0,
            max_vertical: 30.0,
            max_horizontal: 60.0,
            follow_smooth: 5.0,
            offset: [0.0, 1.5, 0.0],
        }
    }
}

impl CameraConfig {
    pub fn offset_vec(&self) -> Vector3<f64> {
        Vector3::from(self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub detection_range: f64,   // m
    pub prompt: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            detection_range: 3.0,
            prompt: "Interact\n   (E)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoldConfig {
    pub throw_force: f64,       // N·s
    pub hold_distance: f64,     // m in front of the hold point
    pub follow_speed: f64,      // 1/s
    /// Hold point in camera-local coordinates. `None` disables carrying.
    pub hold_point: Option<[f64; 3]>,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            throw_force: 2.0,
            hold_distance: 2.0,
            follow_speed: 10.0,
            hold_point: Some([0.0, -0.3, 0.0]),
        }
    }
}

/// Vehicle body setup applied on initialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub lock_tilt: bool,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self { linear_damping: 1.5, angular_damping: 2.0, lock_tilt: true }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ControllerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: ControllerConfig = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ControllerConfig = toml::from_str(content)
            .map_err(|source| ConfigError::Parse { path: PathBuf::from("<inline>"), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        let c = &self.camera;
        let h = &self.hold;

        let non_negative = [
            ("movement.max_speed", m.max_speed),
            ("movement.max_turn_speed", m.max_turn_speed),
            ("movement.scroll_deadzone", m.scroll_deadzone),
            ("camera.max_horizontal", c.max_horizontal),
            ("camera.follow_smooth", c.follow_smooth),
            ("interaction.detection_range", self.interaction.detection_range),
            ("hold.hold_distance", h.hold_distance),
            ("hold.follow_speed", h.follow_speed),
            ("body.linear_damping", self.body.linear_damping),
            ("body.angular_damping", self.body.angular_damping),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a finite value >= 0, got {v}")));
            }
        }

        let finite = [
            ("movement.wheel_force", m.wheel_force),
            ("movement.turn_force", m.turn_force),
            ("camera.sensitivity", c.sensitivity),
            ("camera.min_vertical", c.min_vertical),
            ("camera.max_vertical", c.max_vertical),
            ("hold.throw_force", h.throw_force),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {v}")));
            }
        }

        if c.min_vertical > c.max_vertical {
            return Err(ConfigError::Invalid(format!(
                "camera.min_vertical ({}) exceeds camera.max_vertical ({})",
                c.min_vertical, c.max_vertical
            )));
        }
        if m.pulse_threshold == 0 {
            return Err(ConfigError::Invalid("movement.pulse_threshold must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ControllerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ControllerConfig::default());
        assert_eq!(config.movement.wheel_force, 200.0);
        assert_eq!(config.movement.pulse_threshold, 6);
        assert_eq!(config.camera.offset_vec(), Vector3::new(0.0, 1.5, 0.0));
        assert!(config.body.lock_tilt);
    }

    #[test]
    fn partial_sections_override_fields() {
        let toml = r#"
            [movement]
            max_speed = 3.5

            [camera]
            min_vertical = -45.0
            offset = [0.0, 1.2, -0.2]

            [hold]
            hold_point = [0.1, 0.0, 0.4]
        "#;
        let config = ControllerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.movement.max_speed, 3.5);
        assert_eq!(config.movement.wheel_force, 200.0);
        assert_eq!(config.camera.min_vertical, -45.0);
        assert_eq!(config.camera.max_vertical, 30.0);
        assert_eq!(config.camera.offset, [0.0, 1.2, -0.2]);
        assert_eq!(config.hold.hold_point, Some([0.1, 0.0, 0.4]));
    }

    #[test]
    fn inverted_pitch_range_rejected() {
        let toml = "[camera]\nmin_vertical = 40.0\nmax_vertical = 10.0\n";
        let err = ControllerConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("min_vertical"));
    }

    #[test]
    fn zero_threshold_and_negative_range_rejected() {
        assert!(ControllerConfig::from_toml_str("[movement]\npulse_threshold = 0\n").is_err());
        assert!(ControllerConfig::from_toml_str("[interaction]\ndetection_range = -1.0\n").is_err());
    }

    #[test]
    fn overridden_sensitivity_must_be_finite() {
        let mut config = ControllerConfig::default();
        config.camera.sensitivity = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("camera.sensitivity")));
        config.camera.sensitivity = 4.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = ControllerConfig::from_toml_str("[movement\nmax_speed = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ControllerConfig::from_file(Path::new("/nonexistent/wheelchair.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
