use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs for one character controller.
///
/// Every field is a plain number with no cross-field validation beyond
/// non-negativity. Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerConfig {
    // Movement
    pub move_speed: f32,
    /// Facing slerp factor per second.
    pub rotation_speed: f32,
    /// Fraction of planar speed available while airborne.
    pub air_control_factor: f32,
    /// Intent magnitude below which facing is left alone.
    pub rotation_deadzone: f32,

    // Jump
    pub jump_force: f32,
    /// Extra gravity applied while airborne, on top of engine gravity.
    pub gravity_multiplier: f32,
    pub gravity: Vec3,
    pub mass: f32,

    // Ground probe
    pub ground_check_distance: f32,
    pub sphere_radius: f32,

    // Timing windows (seconds)
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
    pub jump_cooldown: f32,

    // Lifecycle
    pub startup_delay: f32,
    pub death_delay: f32,
    pub epsilon_distance: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 10.0,
            air_control_factor: 0.5,
            rotation_deadzone: 0.1,
            jump_force: 8.0,
            gravity_multiplier: 2.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            mass: 1.0,
            ground_check_distance: 0.2,
            sphere_radius: 0.5,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            jump_cooldown: 0.2,
            startup_delay: 1.0,
            death_delay: 1.0,
            epsilon_distance: 0.1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config option '{field}' must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("config option '{field}' must be finite")]
    NonFinite { field: &'static str },
}

impl ControllerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Rejects negative or non-finite knobs. `gravity` is a direction and
    /// only has to be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars: [(&'static str, f32); 15] = [
            ("moveSpeed", self.move_speed),
            ("rotationSpeed", self.rotation_speed),
            ("airControlFactor", self.air_control_factor),
            ("rotationDeadzone", self.rotation_deadzone),
            ("jumpForce", self.jump_force),
            ("gravityMultiplier", self.gravity_multiplier),
            ("mass", self.mass),
            ("groundCheckDistance", self.ground_check_distance),
            ("sphereRadius", self.sphere_radius),
            ("coyoteTime", self.coyote_time),
            ("jumpBufferTime", self.jump_buffer_time),
            ("jumpCooldown", self.jump_cooldown),
            ("startupDelay", self.startup_delay),
            ("deathDelay", self.death_delay),
            ("epsilonDistance", self.epsilon_distance),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite { field: "gravity" });
        }
        Ok(())
    }
}
