//! Sky Glider - fly a glider through a ring course
//!
//! Core modules:
//! - `sim`: Deterministic simulation (flight dynamics, obstacles, wind, detection, session)
//! - `settings`: Data-driven tuning and course layout, loaded from JSON
//! - `error`: Configuration errors raised at construction time
//!
//! Rendering, camera and input wiring live outside this crate. A host feeds
//! [`sim::InputSignal`]s plus elapsed/delta time into [`sim::Session::step`]
//! and draws from the returned [`sim::SessionSnapshot`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Settings, StepMode, Tuning};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep for [`crate::StepMode::Fixed`] (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the fixed-step accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Glider defaults
    pub const GLIDER_START: Vec3 = Vec3::new(0.0, 18.0, -15.0);
    pub const GLIDER_RADIUS: f32 = 1.2;
    /// Pitch is clamped to ±this many radians
    pub const PITCH_LIMIT: f32 = 0.8;

    /// Flight dynamics
    pub const GRAVITY: Vec3 = Vec3::new(0.0, -4.0, 0.0);
    pub const THRUST_STRENGTH: f32 = 8.0;
    /// Velocity damping factor applied after every integration step
    pub const DRAG: f32 = 0.98;
    /// Pitch/yaw rate (radians per second) at full input
    pub const TURN_SPEED: f32 = 1.2;

    /// Course generation defaults
    pub const RING_COUNT: usize = 12;
    pub const RING_SPACING: f32 = 14.0;
    pub const RING_CURVE: f32 = 0.25;
    pub const RING_RADIUS: f32 = 4.0;
    /// Lateral swing of the course (x = sin(t * curve) * this)
    pub const COURSE_SWAY: f32 = 25.0;
    /// Base altitude of the course and its undulation
    pub const COURSE_ALTITUDE: f32 = 15.0;
    pub const COURSE_UNDULATION: f32 = 5.0;
    pub const COURSE_UNDULATION_FREQ: f32 = 0.2;

    /// Detection tolerances
    pub const PASS_MARGIN: f32 = 2.0;
    pub const OBSTACLE_RADIUS: f32 = 1.5;
    /// Falling below this altitude is a crash
    pub const FLOOR_Y: f32 = 5.0;
    /// Reaching this depth finishes the run
    pub const FINISH_Z: f32 = 160.0;

    /// Vertical bob of an obstacle relative to its orbit radius
    pub const OBSTACLE_BOB: f32 = 0.3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return angle;
    }
    angle = angle.rem_euclid(TAU);
    if angle >= PI {
        angle -= TAU;
    }
    angle
}
