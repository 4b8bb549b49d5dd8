//! Flight dynamics
//!
//! Semi-implicit Euler under gravity, wind and thrust, with velocity damping
//! applied after every step.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::forward;
use crate::consts::*;
use crate::settings::Tuning;

/// Pose and motion of the glider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GliderState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Radians, kept within ±pitch limit
    pub pitch: f32,
    /// Radians, unbounded
    pub yaw: f32,
    pub radius: f32,
}

impl Default for GliderState {
    fn default() -> Self {
        Self::at(GLIDER_START, GLIDER_RADIUS)
    }
}

impl GliderState {
    /// Glider at rest, level, facing -Z
    pub fn at(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            radius,
        }
    }

    /// Glider at the tuning's start position
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::at(tuning.start_position, tuning.glider_radius)
    }

    /// Direction thrust pushes in
    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward(self.yaw, self.pitch)
    }
}

/// Player input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSignal {
    /// Pitch command: -1, 0 or +1
    pub pitch: i8,
    /// +1 turns left, -1 turns right
    pub yaw: i8,
    pub thrust: bool,
}

impl InputSignal {
    pub fn new(pitch: i8, yaw: i8, thrust: bool) -> Self {
        Self { pitch, yaw, thrust }
    }

    /// Pitch command reduced to -1, 0 or 1
    #[inline]
    pub fn pitch_axis(&self) -> f32 {
        f32::from(self.pitch.signum())
    }

    /// Yaw command reduced to -1, 0 or 1
    #[inline]
    pub fn yaw_axis(&self) -> f32 {
        f32::from(self.yaw.signum())
    }
}

/// Acceleration acting on the glider this tick
pub fn acceleration(glider: &GliderState, input: &InputSignal, wind: Vec3, tuning: &Tuning) -> Vec3 {
    let mut accel = tuning.gravity + wind;
    if input.thrust {
        accel += glider.forward() * tuning.thrust_strength;
    }
    accel
}

/// Advance the glider by `dt` seconds
///
/// `wind` is the wind field sampled at the glider's position before the step.
pub fn integrate(glider: &mut GliderState, input: &InputSignal, wind: Vec3, tuning: &Tuning, dt: f32) {
    let accel = acceleration(glider, input, wind, tuning);

    glider.velocity += accel * dt;
    glider.velocity *= tuning.drag;
    glider.position += glider.velocity * dt;

    glider.pitch += input.pitch_axis() * tuning.turn_speed * dt;
    glider.yaw += input.yaw_axis() * tuning.turn_speed * dt;
    glider.pitch = glider.pitch.clamp(-tuning.pitch_limit, tuning.pitch_limit);
}
