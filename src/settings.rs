//! Game tuning and course settings
//!
//! Every magic number the simulation uses has a named default in
//! [`crate::consts`] and can be overridden here, either in code or from a
//! JSON file.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, require_finite, require_positive};
use crate::sim::course::CourseLayout;

/// How frame deltas turn into simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StepMode {
    /// One tick per frame using the frame delta as given
    #[default]
    Variable,
    /// Accumulate frame time and tick in fixed `dt` increments
    Fixed { dt: f32 },
}

impl StepMode {
    pub fn fixed() -> Self {
        StepMode::Fixed { dt: SIM_DT }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepMode::Variable => "variable",
            StepMode::Fixed { .. } => "fixed",
        }
    }
}

/// Physics and detection constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Flight dynamics ===
    pub gravity: Vec3,
    pub thrust_strength: f32,
    /// Velocity multiplier applied after each integration step, in (0, 1]
    pub drag: f32,
    /// Pitch/yaw rate in radians per second
    pub turn_speed: f32,
    pub pitch_limit: f32,

    // === Glider ===
    pub start_position: Vec3,
    pub glider_radius: f32,

    // === Detection ===
    /// Collision radius of every obstacle body
    pub obstacle_radius: f32,
    /// Slack added to the ring plane distance and the ring radius
    pub pass_margin: f32,
    /// Altitude below which the glider crashes
    pub floor_y: f32,
    /// Depth at which the run finishes
    pub finish_z: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            thrust_strength: THRUST_STRENGTH,
            drag: DRAG,
            turn_speed: TURN_SPEED,
            pitch_limit: PITCH_LIMIT,

            start_position: GLIDER_START,
            glider_radius: GLIDER_RADIUS,

            obstacle_radius: OBSTACLE_RADIUS,
            pass_margin: PASS_MARGIN,
            floor_y: FLOOR_Y,
            finish_z: FINISH_Z,
        }
    }
}

impl Tuning {
    /// Reject values that would make the simulation misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("gravity", self.gravity)?;
        require_finite("start position", self.start_position)?;
        if !(self.drag.is_finite() && self.drag > 0.0 && self.drag <= 1.0) {
            return Err(ConfigError::Drag(self.drag));
        }
        if !(self.thrust_strength.is_finite() && self.thrust_strength >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "thrust strength",
                value: self.thrust_strength,
            });
        }
        require_positive("turn speed", self.turn_speed)?;
        require_positive("pitch limit", self.pitch_limit)?;
        require_positive("glider radius", self.glider_radius)?;
        require_positive("obstacle radius", self.obstacle_radius)?;
        require_positive("pass margin", self.pass_margin)?;
        if !(self.floor_y.is_finite() && self.finish_z.is_finite()) {
            return Err(ConfigError::NonFinite("floor/finish thresholds"));
        }
        Ok(())
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub course: CourseLayout,
    pub step_mode: StepMode,
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tuning.validate()?;
        if let StepMode::Fixed { dt } = self.step_mode {
            require_positive("fixed step", dt)?;
        }
        Ok(())
    }
}
