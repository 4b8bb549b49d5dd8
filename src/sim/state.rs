//! Session state and core run types
//!
//! Everything that changes during a run lives in [`SessionState`]. The course
//! and tuning are immutable and owned next to it by [`super::Session`].

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::CrashCause;
use super::flight::GliderState;
use crate::settings::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Flying
    Active,
    /// Hit an obstacle or the floor; frozen until reset
    Crashed,
    /// Crossed the finish line; frozen until reset
    Finished,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Active)
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RingPassed { index: usize },
    Crashed { cause: CrashCause },
    Finished,
}

/// Mutable state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub glider: GliderState,
    /// Indices of rings passed this run
    pub passed_rings: BTreeSet<usize>,
    /// Highest passed ring index + 1 (informational, rings may be taken in any order)
    pub next_ring: usize,
    pub crashed: bool,
    pub finished: bool,
    /// Elapsed time when the run started; set on the first tick if unknown
    pub start_time: Option<f32>,
    /// Elapsed time of the tick that ended the run
    pub end_time: Option<f32>,
    /// Depth at which the run finishes
    pub finish_z: f32,
    /// Obstacle world positions as of the last simulated tick
    pub obstacle_positions: Vec<Vec3>,
    /// Latest elapsed time seen by a tick
    pub elapsed: f32,
    /// Simulated ticks this run
    pub time_ticks: u64,
}

impl SessionState {
    /// Fresh run with the glider at the tuning's start position
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            glider: GliderState::from_tuning(tuning),
            passed_rings: BTreeSet::new(),
            next_ring: 0,
            crashed: false,
            finished: false,
            start_time: None,
            end_time: None,
            finish_z: tuning.finish_z,
            obstacle_positions: Vec::new(),
            elapsed: 0.0,
            time_ticks: 0,
        }
    }

    /// Reinitialize for a new run starting at `now`
    pub fn reset(&mut self, tuning: &Tuning, now: f32) {
        self.glider = GliderState::from_tuning(tuning);
        self.passed_rings.clear();
        self.next_ring = 0;
        self.crashed = false;
        self.finished = false;
        self.start_time = Some(now);
        self.end_time = None;
        self.finish_z = tuning.finish_z;
        self.elapsed = now;
        self.time_ticks = 0;
    }

    pub fn phase(&self) -> Phase {
        if self.crashed {
            Phase::Crashed
        } else if self.finished {
            Phase::Finished
        } else {
            Phase::Active
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.crashed || self.finished
    }

    /// Record a passed ring; returns false if it was already passed
    pub fn record_ring(&mut self, index: usize) -> bool {
        if !self.passed_rings.insert(index) {
            return false;
        }
        if index >= self.next_ring {
            self.next_ring = index + 1;
        }
        true
    }

    /// Seconds since the run started, stopped at the terminal tick
    pub fn run_time(&self) -> f32 {
        let start = self.start_time.unwrap_or(self.elapsed);
        let end = self.end_time.unwrap_or(self.elapsed);
        (end - start).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = SessionState::new(&Tuning::default());
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.glider.position, Vec3::new(0.0, 18.0, -15.0));
        assert!(state.passed_rings.is_empty());
        assert_eq!(state.next_ring, 0);
        assert_eq!(state.start_time, None);
    }

    #[test]
    fn test_record_ring_watermark() {
        let mut state = SessionState::new(&Tuning::default());
        assert!(state.record_ring(3));
        assert_eq!(state.next_ring, 4);
        // Out of order: an earlier ring does not move the watermark back
        assert!(state.record_ring(1));
        assert_eq!(state.next_ring, 4);
        assert!(!state.record_ring(3));
        assert_eq!(state.passed_rings.len(), 2);
    }

    #[test]
    fn test_phase_prefers_crash() {
        let mut state = SessionState::new(&Tuning::default());
        state.finished = true;
        assert_eq!(state.phase(), Phase::Finished);
        state.crashed = true;
        assert_eq!(state.phase(), Phase::Crashed);
        assert!(state.phase().is_terminal());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);
        state.glider.position = Vec3::new(5.0, 1.0, 90.0);
        state.glider.pitch = 0.4;
        state.record_ring(2);
        state.crashed = true;
        state.end_time = Some(12.0);

        state.reset(&tuning, 12.5);
        assert_eq!(state.glider, GliderState::default());
        assert!(state.passed_rings.is_empty());
        assert_eq!(state.next_ring, 0);
        assert_eq!(state.phase(), Phase::Active);
        assert_eq!(state.start_time, Some(12.5));
        assert_eq!(state.run_time(), 0.0);
    }

    #[test]
    fn test_run_time_stops_at_end() {
        let mut state = SessionState::new(&Tuning::default());
        state.start_time = Some(2.0);
        state.elapsed = 10.0;
        assert_eq!(state.run_time(), 8.0);
        state.end_time = Some(7.0);
        state.elapsed = 30.0;
        assert_eq!(state.run_time(), 5.0);
    }
}
