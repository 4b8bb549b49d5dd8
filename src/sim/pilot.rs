//! Computer-generated input
//!
//! [`Autopilot`] flies toward the next unpassed ring, for demo/idle mode and
//! headless runs. [`random_tape`] builds reproducible input sequences from a
//! seed.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::flight::InputSignal;
use super::session::Session;
use crate::normalize_angle;

/// Simple bearing-following pilot
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Heading/attitude error (radians) tolerated before steering
    pub deadband: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { deadband: 0.05 }
    }
}

impl Autopilot {
    /// Input steering toward `target`
    pub fn input_toward(&self, position: Vec3, yaw: f32, pitch: f32, target: Vec3) -> InputSignal {
        let to_target = target - position;
        if to_target.length_squared() < 1e-6 {
            return InputSignal::new(0, 0, true);
        }

        // forward() faces -Z at yaw 0 and -X at yaw π/2
        let desired_yaw = (-to_target.x).atan2(-to_target.z);
        let yaw_error = normalize_angle(desired_yaw - yaw);

        // forward().y = -sin(pitch), so climbing needs negative pitch
        let horizontal = Vec3::new(to_target.x, 0.0, to_target.z).length();
        let desired_pitch = -(to_target.y.atan2(horizontal));
        let pitch_error = desired_pitch - pitch;

        InputSignal::new(self.command(pitch_error), self.command(yaw_error), true)
    }

    /// Input steering toward the lowest-index ring not yet passed
    ///
    /// Once every ring is passed, heads straight for the finish depth.
    pub fn input_for(&self, session: &Session) -> InputSignal {
        let state = session.state();
        let glider = &state.glider;
        let target = session
            .rings()
            .iter()
            .find(|ring| !state.passed_rings.contains(&ring.index))
            .map(|ring| ring.center)
            .unwrap_or_else(|| Vec3::new(glider.position.x, glider.position.y, state.finish_z + 1.0));
        self.input_toward(glider.position, glider.yaw, glider.pitch, target)
    }

    fn command(&self, error: f32) -> i8 {
        if error > self.deadband {
            1
        } else if error < -self.deadband {
            -1
        } else {
            0
        }
    }
}

/// Reproducible pseudo-random input sequence
pub fn random_tape(seed: u64, ticks: usize) -> Vec<InputSignal> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..ticks)
        .map(|_| {
            InputSignal::new(
                rng.random_range(-1..=1),
                rng.random_range(-1..=1),
                rng.random_bool(0.7),
            )
        })
        .collect()
}
