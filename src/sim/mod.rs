//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the caller (elapsed and delta seconds)
//! - Obstacles are evaluated from time, never integrated
//! - Stable iteration order (rings by index, obstacles by definition order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod course;
pub mod flight;
pub mod geometry;
pub mod obstacle;
pub mod pilot;
pub mod session;
pub mod state;
pub mod tick;
pub mod wind;

pub use collision::{CrashCause, RingPassResult, check_ring_pass};
pub use course::{Course, CourseLayout, Ring, generate_rings};
pub use flight::{GliderState, InputSignal, integrate};
pub use obstacle::{Obstacle, position_at};
pub use pilot::{Autopilot, random_tape};
pub use session::{FixedStepper, Session, SessionSnapshot};
pub use state::{GameEvent, Phase, SessionState};
pub use tick::tick;
pub use wind::{WindZone, sample as sample_wind};
