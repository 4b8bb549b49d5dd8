//! Vector helpers shared by the integrator and detector
//!
//! Arithmetic (add, subtract, scale, dot, length) comes straight from
//! `glam::Vec3`. This module adds the few operations with a policy attached.

use glam::Vec3;

/// Lengths at or below this are treated as zero
pub const EPSILON: f32 = 1e-6;

/// Unit vector in the direction of `v`, or zero when `v` has no direction
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    if v.length_squared() <= EPSILON * EPSILON {
        Vec3::ZERO
    } else {
        v.normalize_or_zero()
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).length()
}

/// Component of `v` along the unit vector `axis`
#[inline]
pub fn project_onto_axis(v: Vec3, axis: Vec3) -> Vec3 {
    axis * v.dot(axis)
}

/// Component of `v` lying in the plane whose unit normal is `axis`
///
/// `v - axis * (v · axis)`
#[inline]
pub fn project_onto_plane(v: Vec3, axis: Vec3) -> Vec3 {
    v - project_onto_axis(v, axis)
}

/// Body-forward direction for a yaw/pitch attitude
///
/// Yaw 0, pitch 0 faces -Z. Positive pitch noses down.
#[inline]
pub fn forward(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(-sin_yaw * cos_pitch, -sin_pitch, -cos_yaw * cos_pitch)
}

/// Inclusive axis-aligned box containment
#[inline]
pub fn box_contains(center: Vec3, half_extents: Vec3, point: Vec3) -> bool {
    let min = center - half_extents;
    let max = center + half_extents;
    point.cmpge(min).all() && point.cmple(max).all()
}

/// Whether two spheres overlap (touching does not count)
#[inline]
pub fn spheres_overlap(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> bool {
    distance(center_a, center_b) < radius_a + radius_b
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_safe_normalize_degenerate() {
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(safe_normalize(Vec3::splat(1e-9)), Vec3::ZERO);
        let n = safe_normalize(Vec3::new(3.0, 0.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert_eq!(safe_normalize(Vec3::new(f32::INFINITY, 0.0, 0.0)), Vec3::ZERO);
        assert_eq!(safe_normalize(Vec3::new(f32::NAN, 1.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_project_onto_plane() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let in_plane = project_onto_plane(v, Vec3::Z);
        assert_eq!(in_plane, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(project_onto_axis(v, Vec3::Z), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_forward_directions() {
        let f = forward(0.0, 0.0);
        assert!((f - Vec3::NEG_Z).length() < 1e-6);

        // Yawing a quarter turn faces -X
        let f = forward(FRAC_PI_2, 0.0);
        assert!((f - Vec3::NEG_X).length() < 1e-6);

        // Positive pitch points the nose down
        let f = forward(0.0, 0.5);
        assert!(f.y < 0.0);
        assert!((f.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_box_contains_inclusive() {
        let c = Vec3::new(10.0, 18.0, 30.0);
        let h = Vec3::new(8.0, 6.0, 10.0);
        assert!(box_contains(c, h, c));
        assert!(box_contains(c, h, Vec3::new(18.0, 24.0, 40.0)));
        assert!(box_contains(c, h, Vec3::new(2.0, 12.0, 20.0)));
        assert!(!box_contains(c, h, Vec3::new(18.1, 18.0, 30.0)));
    }

    #[test]
    fn test_spheres_overlap() {
        assert!(spheres_overlap(Vec3::ZERO, 1.2, Vec3::new(2.0, 0.0, 0.0), 1.5));
        // Exactly touching is not a hit
        assert!(!spheres_overlap(Vec3::ZERO, 1.0, Vec3::new(2.0, 0.0, 0.0), 1.0));
    }
}
