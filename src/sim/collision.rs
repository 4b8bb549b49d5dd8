//! Crash, ring-pass and finish detection
//!
//! Spheres for the glider and obstacles, a slab-and-disc test for rings, and
//! plain threshold checks for the floor and the finish line.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::course::Ring;
use super::geometry::{project_onto_plane, spheres_overlap};

/// Result of a ring-pass check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPassResult {
    /// Whether the glider is passing through the ring
    pub passed: bool,
    /// Distance from the glider to the ring's plane
    pub along_normal: f32,
    /// Lateral distance from the ring center within its plane
    pub in_plane: f32,
}

/// Test whether the glider center is passing through a ring
///
/// The glider must be within `pass_margin` of the ring plane and within
/// `radius + pass_margin` of the ring center laterally.
pub fn check_ring_pass(glider_pos: Vec3, ring: &Ring, pass_margin: f32) -> RingPassResult {
    let to_ring = ring.center - glider_pos;
    let along_normal = to_ring.dot(ring.normal).abs();
    let in_plane = project_onto_plane(to_ring, ring.normal).length();

    RingPassResult {
        passed: along_normal < pass_margin && in_plane < ring.radius + pass_margin,
        along_normal,
        in_plane,
    }
}

/// Index of the first obstacle the glider overlaps, if any
pub fn first_obstacle_hit(
    glider_pos: Vec3,
    glider_radius: f32,
    obstacle_positions: &[Vec3],
    obstacle_radius: f32,
) -> Option<usize> {
    obstacle_positions
        .iter()
        .position(|&p| spheres_overlap(glider_pos, glider_radius, p, obstacle_radius))
}

/// Whether the glider has dropped below the floor
#[inline]
pub fn below_floor(glider_pos: Vec3, floor_y: f32) -> bool {
    glider_pos.y < floor_y
}

/// Whether the glider has reached the finish depth
#[inline]
pub fn reached_finish(glider_pos: Vec3, finish_z: f32) -> bool {
    glider_pos.z >= finish_z
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Hit the obstacle at this index
    Obstacle { index: usize },
    /// Fell below the floor
    Floor,
}

/// Outcome of one detection pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Crash causes in check order (obstacle first, then floor)
    pub crashes: Vec<CrashCause>,
    /// Rings newly passed this tick, ascending
    pub rings_passed: Vec<usize>,
    pub finished: bool,
}

impl Detection {
    pub fn crashed(&self) -> bool {
        !self.crashes.is_empty()
    }
}

/// Parameters the detector needs besides geometry
#[derive(Debug, Clone, Copy)]
pub struct DetectorLimits {
    pub glider_radius: f32,
    pub obstacle_radius: f32,
    pub pass_margin: f32,
    pub floor_y: f32,
    pub finish_z: f32,
}

/// Run every check against the glider's updated position
///
/// Rings already in `passed` are skipped; the caller records the new ones.
pub fn detect(
    glider_pos: Vec3,
    obstacle_positions: &[Vec3],
    rings: &[Ring],
    passed: &BTreeSet<usize>,
    limits: &DetectorLimits,
) -> Detection {
    let mut detection = Detection::default();

    if let Some(index) = first_obstacle_hit(
        glider_pos,
        limits.glider_radius,
        obstacle_positions,
        limits.obstacle_radius,
    ) {
        detection.crashes.push(CrashCause::Obstacle { index });
    }

    detection.rings_passed = rings
        .iter()
        .filter(|ring| !passed.contains(&ring.index))
        .filter(|ring| check_ring_pass(glider_pos, ring, limits.pass_margin).passed)
        .map(|ring| ring.index)
        .collect();

    detection.finished = reached_finish(glider_pos, limits.finish_z);

    if below_floor(glider_pos, limits.floor_y) {
        detection.crashes.push(CrashCause::Floor);
    }

    detection
}
