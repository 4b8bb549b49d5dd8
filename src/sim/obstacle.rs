//! Path-based obstacle motion
//!
//! An obstacle never stores a velocity. Its world position is evaluated from
//! elapsed time every tick, so long runs cannot drift.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::OBSTACLE_BOB;
use crate::error::{ConfigError, require_finite};

/// A hazard orbiting a fixed center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Reference center of the orbit (does not move)
    pub center: Vec3,
    /// Seconds per revolution
    pub period: f32,
    /// Phase offset in radians
    #[serde(default)]
    pub phase: f32,
    /// Orbit radius in the X/Z plane
    #[serde(alias = "radius")]
    pub orbit_radius: f32,
}

impl Obstacle {
    pub fn new(center: Vec3, period: f32, phase: f32, orbit_radius: f32) -> Result<Self, ConfigError> {
        let obstacle = Self {
            center,
            period,
            phase,
            orbit_radius,
        };
        obstacle.validate(0)?;
        Ok(obstacle)
    }

    /// Check the definition; `index` is only used to label the error
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        require_finite("obstacle center", self.center)?;
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(ConfigError::ObstaclePeriod {
                index,
                value: self.period,
            });
        }
        if !(self.orbit_radius.is_finite() && self.orbit_radius >= 0.0) {
            return Err(ConfigError::ObstacleRadius {
                index,
                value: self.orbit_radius,
            });
        }
        if !self.phase.is_finite() {
            return Err(ConfigError::NonFinite("obstacle phase"));
        }
        Ok(())
    }

    /// World position at `elapsed` seconds
    #[inline]
    pub fn position_at(&self, elapsed: f32) -> Vec3 {
        position_at(self, elapsed)
    }
}

/// Orbit angle at `elapsed` seconds, reduced to one revolution
///
/// Reducing the time first keeps f32 precision for long sessions.
#[inline]
fn orbit_angle(obstacle: &Obstacle, elapsed: f32) -> f32 {
    let cycle = elapsed.rem_euclid(obstacle.period) / obstacle.period;
    cycle * TAU + obstacle.phase
}

/// Elliptical X/Z orbit with a double-frequency vertical bob
///
/// `center + (r cos φ, 0.3 r sin 2φ, r sin φ)`, `φ = t * 2π / period + phase`
pub fn position_at(obstacle: &Obstacle, elapsed: f32) -> Vec3 {
    let phi = orbit_angle(obstacle, elapsed);
    let r = obstacle.orbit_radius;
    obstacle.center + Vec3::new(r * phi.cos(), r * OBSTACLE_BOB * (2.0 * phi).sin(), r * phi.sin())
}

/// Positions of every obstacle at `elapsed`, in definition order
pub fn positions_at(obstacles: &[Obstacle], elapsed: f32) -> Vec<Vec3> {
    obstacles.iter().map(|o| position_at(o, elapsed)).collect()
}
