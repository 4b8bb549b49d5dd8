//! Simulation tick
//!
//! One tick: integrate the glider, evaluate obstacle paths, then run the
//! detectors against the updated pose.

use super::collision::{DetectorLimits, detect};
use super::course::Course;
use super::flight::{InputSignal, integrate};
use super::obstacle::positions_at;
use super::state::{GameEvent, SessionState};
use super::wind;
use crate::settings::Tuning;

/// Advance the session by one tick of `dt` seconds at absolute time `elapsed`
///
/// Returns the events raised. A crashed or finished session is left untouched.
pub fn tick(
    state: &mut SessionState,
    course: &Course,
    tuning: &Tuning,
    input: &InputSignal,
    elapsed: f32,
    dt: f32,
) -> Vec<GameEvent> {
    if state.is_terminal() {
        return Vec::new();
    }

    if state.start_time.is_none() {
        state.start_time = Some(elapsed);
    }
    state.elapsed = elapsed;
    state.time_ticks += 1;

    // Flight dynamics under gravity, wind and thrust
    let wind = wind::sample(state.glider.position, course.wind_zones());
    integrate(&mut state.glider, input, wind, tuning, dt);

    // Obstacles are a pure function of time
    state.obstacle_positions = positions_at(course.obstacles(), elapsed);

    let limits = DetectorLimits {
        glider_radius: state.glider.radius,
        obstacle_radius: tuning.obstacle_radius,
        pass_margin: tuning.pass_margin,
        floor_y: tuning.floor_y,
        finish_z: state.finish_z,
    };
    let detection = detect(
        state.glider.position,
        &state.obstacle_positions,
        course.rings(),
        &state.passed_rings,
        &limits,
    );

    let mut events = Vec::new();

    for index in detection.rings_passed {
        if state.record_ring(index) {
            log::info!(
                "Ring {} passed ({}/{})",
                index,
                state.passed_rings.len(),
                course.rings().len()
            );
            events.push(GameEvent::RingPassed { index });
        }
    }

    if let Some(&cause) = detection.crashes.first() {
        state.crashed = true;
        log::info!("Crashed ({:?}) at {:?}", cause, state.glider.position);
        events.push(GameEvent::Crashed { cause });
    }

    if detection.finished {
        state.finished = true;
        log::info!(
            "Finished with {}/{} rings in {:.2}s",
            state.passed_rings.len(),
            course.rings().len(),
            elapsed - state.start_time.unwrap_or(elapsed)
        );
        events.push(GameEvent::Finished);
    }

    if state.is_terminal() {
        state.end_time = Some(elapsed);
    } else {
        log::debug!(
            "tick {}: pos={:?} vel={:?} wind={:?}",
            state.time_ticks,
            state.glider.position,
            state.glider.velocity,
            wind
        );
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::CrashCause;
    use crate::sim::course::{CourseLayout, Ring};
    use crate::sim::obstacle::Obstacle;
    use crate::sim::state::Phase;
    use crate::sim::wind::WindZone;
    use glam::Vec3;

    fn empty_course() -> Course {
        Course::from_parts(Vec::new(), Vec::new(), Vec::new()).unwrap()
    }

    #[test]
    fn test_free_fall_tick() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);
        let events = tick(&mut state, &empty_course(), &tuning, &InputSignal::default(), 1.0, 1.0);

        assert!(events.is_empty());
        assert!((state.glider.velocity - Vec3::new(0.0, -3.92, 0.0)).length() < 1e-5);
        assert!((state.glider.position - Vec3::new(0.0, 14.08, -15.0)).length() < 1e-5);
        assert_eq!(state.start_time, Some(1.0));
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_wind_zone_samples_pre_step_position() {
        let tuning = Tuning {
            drag: 1.0,
            gravity: Vec3::ZERO,
            ..Default::default()
        };
        let zone = WindZone::new(Tuning::default().start_position, Vec3::splat(0.5), Vec3::X).unwrap();
        let course = Course::from_parts(Vec::new(), vec![zone], Vec::new()).unwrap();
        let mut state = SessionState::new(&tuning);

        tick(&mut state, &course, &tuning, &InputSignal::default(), 0.0, 1.0);
        assert_eq!(state.glider.velocity, Vec3::X);
        // Now outside the zone: velocity unchanged
        tick(&mut state, &course, &tuning, &InputSignal::default(), 1.0, 1.0);
        assert_eq!(state.glider.velocity, Vec3::X);
    }

    #[test]
    fn test_ring_pass_event() {
        let tuning = Tuning::default();
        let ring = Ring::new(0, tuning.start_position, Vec3::Z, 4.0).unwrap();
        let course = Course::from_parts(vec![ring], Vec::new(), Vec::new()).unwrap();
        let mut state = SessionState::new(&tuning);

        let events = tick(&mut state, &course, &tuning, &InputSignal::default(), 0.0, 0.0);
        assert_eq!(events, vec![GameEvent::RingPassed { index: 0 }]);
        assert!(state.passed_rings.contains(&0));
        assert_eq!(state.next_ring, 1);

        // Staying in the ring does not pass it again
        let events = tick(&mut state, &course, &tuning, &InputSignal::default(), 0.0, 0.0);
        assert!(events.is_empty());
        assert_eq!(state.passed_rings.len(), 1);
    }

    #[test]
    fn test_obstacle_crash_freezes() {
        let tuning = Tuning::default();
        // Stationary obstacle sitting on the start position
        let obstacle = Obstacle::new(tuning.start_position, 4.0, 0.0, 0.0).unwrap();
        let course = Course::from_parts(Vec::new(), Vec::new(), vec![obstacle]).unwrap();
        let mut state = SessionState::new(&tuning);

        let events = tick(&mut state, &course, &tuning, &InputSignal::default(), 0.0, 0.01);
        assert_eq!(
            events,
            vec![GameEvent::Crashed {
                cause: CrashCause::Obstacle { index: 0 }
            }]
        );
        assert_eq!(state.phase(), Phase::Crashed);

        let frozen = state.clone();
        for i in 0..10 {
            let input = InputSignal::new(1, 1, true);
            assert!(tick(&mut state, &course, &tuning, &input, i as f32, 0.5).is_empty());
        }
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_floor_crash() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(&tuning);
        state.glider.position.y = 5.1;
        state.glider.velocity.y = -10.0;

        let events = tick(&mut state, &empty_course(), &tuning, &InputSignal::default(), 0.0, 0.1);
        assert_eq!(events, vec![GameEvent::Crashed { cause: CrashCause::Floor }]);
        assert!(state.crashed);
        assert_eq!(state.end_time, Some(0.0));
    }

    #[test]
    fn test_finish_at_threshold() {
        let tuning = Tuning {
            gravity: Vec3::ZERO,
            ..Default::default()
        };
        let mut state = SessionState::new(&tuning);
        state.glider.position.z = tuning.finish_z;

        let events = tick(&mut state, &empty_course(), &tuning, &InputSignal::default(), 3.0, 0.0);
        assert_eq!(events, vec![GameEvent::Finished]);
        assert_eq!(state.phase(), Phase::Finished);
    }

    #[test]
    fn test_default_course_start_is_safe() {
        let tuning = Tuning::default();
        let course = Course::build(&CourseLayout::default()).unwrap();
        let mut state = SessionState::new(&tuning);
        let events = tick(&mut state, &course, &tuning, &InputSignal::default(), 0.0, 1.0 / 60.0);
        assert!(events.is_empty());
        assert_eq!(state.obstacle_positions.len(), 3);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let course = Course::build(&CourseLayout::default()).unwrap();
        let mut state1 = SessionState::new(&tuning);
        let mut state2 = SessionState::new(&tuning);

        let inputs = [
            InputSignal::new(0, 0, true),
            InputSignal::new(-1, 1, true),
            InputSignal::new(1, 0, false),
            InputSignal::default(),
        ];

        for (i, input) in inputs.iter().cycle().take(200).enumerate() {
            let t = i as f32 / 60.0;
            tick(&mut state1, &course, &tuning, input, t, 1.0 / 60.0);
            tick(&mut state2, &course, &tuning, input, t, 1.0 / 60.0);
        }

        assert_eq!(state1, state2);
    }
}
