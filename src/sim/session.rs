//! Session controller
//!
//! Owns the course, tuning and run state, and is the only thing that mutates
//! the run. A presentation layer calls [`Session::step`] (or
//! [`Session::advance`]) once per frame and draws from the snapshot.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::Serialize;

use super::course::{Course, CourseLayout, Ring};
use super::flight::{GliderState, InputSignal};
use super::obstacle::{Obstacle, positions_at};
use super::state::{GameEvent, Phase, SessionState};
use super::tick::tick;
use super::wind::WindZone;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::{ConfigError, require_positive};
use crate::settings::{Settings, StepMode, Tuning};

/// What a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub glider: GliderState,
    pub obstacle_positions: Vec<Vec3>,
    pub passed_rings: BTreeSet<usize>,
    pub next_ring: usize,
    pub crashed: bool,
    pub finished: bool,
    pub phase: Phase,
    /// Seconds since the run started
    pub run_time: f32,
    /// Events raised by the tick(s) that produced this snapshot
    pub events: Vec<GameEvent>,
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStepper {
    dt: f32,
    accumulator: f32,
}

impl FixedStepper {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Add a frame's worth of time; returns how many ticks to run
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= self.dt {
            // Too far behind; drop the backlog rather than spiral
            log::debug!("Dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }
}

/// One game: course, tuning and the run in progress
#[derive(Debug, Clone)]
pub struct Session {
    course: Course,
    tuning: Tuning,
    state: SessionState,
    stepper: Option<FixedStepper>,
    /// Latest host time seen, including frames where the run is frozen
    last_elapsed: f32,
}

impl Session {
    /// Validate the tuning and layout and start a run
    pub fn new(tuning: Tuning, layout: &CourseLayout) -> Result<Self, ConfigError> {
        let course = Course::build(layout)?;
        Self::with_course(tuning, course)
    }

    /// Start a run on an already validated course
    pub fn with_course(tuning: Tuning, course: Course) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let mut state = SessionState::new(&tuning);
        state.obstacle_positions = positions_at(course.obstacles(), 0.0);
        log::info!("Session started: {} rings, finish at z={}", course.rings().len(), tuning.finish_z);
        Ok(Self {
            course,
            tuning,
            state,
            stepper: None,
            last_elapsed: 0.0,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let mut session = Self::new(settings.tuning.clone(), &settings.course)?;
        session.set_step_mode(settings.step_mode)?;
        Ok(session)
    }

    /// Switch step mode; a fixed step must be positive and finite
    pub fn set_step_mode(&mut self, mode: StepMode) -> Result<(), ConfigError> {
        self.stepper = match mode {
            StepMode::Variable => None,
            StepMode::Fixed { dt } => {
                require_positive("fixed step", dt)?;
                Some(FixedStepper::new(dt))
            }
        };
        Ok(())
    }

    pub fn step_mode(&self) -> StepMode {
        match &self.stepper {
            None => StepMode::Variable,
            Some(stepper) => StepMode::Fixed { dt: stepper.dt() },
        }
    }

    /// Run exactly one tick of `delta` seconds at absolute time `elapsed`
    pub fn step(&mut self, input: &InputSignal, elapsed: f32, delta: f32) -> SessionSnapshot {
        self.last_elapsed = elapsed;
        let events = tick(&mut self.state, &self.course, &self.tuning, input, elapsed, delta);
        self.snapshot(events)
    }

    /// Feed one rendered frame using the configured step mode
    ///
    /// Variable mode runs one tick with `frame_delta`. Fixed mode runs as many
    /// fixed ticks as the accumulated time allows, holding `input` for each.
    pub fn advance(&mut self, input: &InputSignal, elapsed: f32, frame_delta: f32) -> SessionSnapshot {
        self.last_elapsed = elapsed;
        let Some(stepper) = self.stepper.as_mut() else {
            return self.step(input, elapsed, frame_delta);
        };

        let substeps = stepper.accumulate(frame_delta);
        let dt = stepper.dt();
        let mut events = Vec::new();

        // Sub-tick times count back from the frame's elapsed time
        for i in 0..substeps {
            let t = elapsed - dt * (substeps - 1 - i) as f32;
            events.extend(tick(&mut self.state, &self.course, &self.tuning, input, t, dt));
        }
        self.snapshot(events)
    }

    /// Start a new run, timestamped at the latest elapsed time passed to
    /// [`Session::step`] or [`Session::advance`]
    pub fn reset(&mut self) {
        self.reset_at(self.last_elapsed);
    }

    /// Start a new run, timestamped at `now`
    pub fn reset_at(&mut self, now: f32) {
        self.last_elapsed = now;
        self.state.reset(&self.tuning, now);
        self.state.obstacle_positions = positions_at(self.course.obstacles(), now);
        if let Some(stepper) = self.stepper.as_mut() {
            stepper.clear();
        }
        log::info!("Session reset at t={:.2}", now);
    }

    /// Current state without running a tick
    pub fn snapshot_now(&self) -> SessionSnapshot {
        self.snapshot(Vec::new())
    }

    fn snapshot(&self, events: Vec<GameEvent>) -> SessionSnapshot {
        SessionSnapshot {
            glider: self.state.glider,
            obstacle_positions: self.state.obstacle_positions.clone(),
            passed_rings: self.state.passed_rings.clone(),
            next_ring: self.state.next_ring,
            crashed: self.state.crashed,
            finished: self.state.finished,
            phase: self.state.phase(),
            run_time: self.state.run_time(),
            events,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        self.course.rings()
    }

    pub fn wind_zones(&self) -> &[WindZone] {
        self.course.wind_zones()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.course.obstacles()
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Place the glider directly, bypassing the integrator (scenario setup)
    #[doc(hidden)]
    pub fn glider_mut(&mut self) -> &mut GliderState {
        &mut self.state.glider
    }
}
