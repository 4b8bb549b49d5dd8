//! Configuration errors
//!
//! The simulation itself cannot fail per tick. Everything that could make it
//! misbehave is rejected here, when a course or tuning is built.

use thiserror::Error;

/// A rejected course, tuning or settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("wind zone {index}: half-extent {axis} must be positive and finite, got {value}")]
    WindZoneExtent { index: usize, axis: char, value: f32 },

    #[error("obstacle {index}: period must be positive and finite, got {value}")]
    ObstaclePeriod { index: usize, value: f32 },

    #[error("obstacle {index}: orbit radius must be non-negative and finite, got {value}")]
    ObstacleRadius { index: usize, value: f32 },

    #[error("ring normal must have non-zero length")]
    DegenerateRingNormal,

    #[error("ring index {index} appears more than once")]
    DuplicateRing { index: usize },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("drag must be in (0, 1], got {0}")]
    Drag(f32),

    #[error("{0} contains a non-finite component")]
    NonFinite(&'static str),

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reject a non-positive or non-finite scalar
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Reject a vector with NaN or infinite components
pub(crate) fn require_finite(name: &'static str, v: glam::Vec3) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite(name))
    }
}
