//! Ring checkpoints and procedural course placement
//!
//! Rings are laid along a swaying, undulating path that advances in +Z.
//! Generation is a pure function of its parameters, so a course can be
//! rebuilt at any time and compared exactly.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::wind::WindZone;
use crate::consts::*;
use crate::error::{ConfigError, require_finite, require_positive};

/// A ring checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Position along the course (0-based)
    pub index: usize,
    pub center: Vec3,
    /// Unit normal of the ring's plane
    pub normal: Vec3,
    pub radius: f32,
}

impl Ring {
    /// Build a ring, normalizing `normal`
    pub fn new(index: usize, center: Vec3, normal: Vec3, radius: f32) -> Result<Self, ConfigError> {
        require_finite("ring center", center)?;
        require_finite("ring normal", normal)?;
        require_positive("ring radius", radius)?;
        let normal = normal.try_normalize().ok_or(ConfigError::DegenerateRingNormal)?;
        Ok(Self {
            index,
            center,
            normal,
            radius,
        })
    }
}

/// Ring centers for a course of `count` rings
///
/// `t = i / max(count - 1, 1) * count * spacing`, then
/// `(sin(t * curve) * 25, 15 + sin(t * 0.2) * 5, t)`.
pub fn ring_centers(count: usize, spacing: f32, curve: f32) -> Vec<Vec3> {
    let denom = count.saturating_sub(1).max(1) as f32;
    let length = count as f32 * spacing;

    (0..count)
        .map(|i| {
            let t = (i as f32 / denom) * length;
            Vec3::new(
                (t * curve).sin() * COURSE_SWAY,
                COURSE_ALTITUDE + (t * COURSE_UNDULATION_FREQ).sin() * COURSE_UNDULATION,
                t,
            )
        })
        .collect()
}

/// Generate the ring sequence with the default ring radius and +Z normal
pub fn generate_rings(count: usize, spacing: f32, curve: f32) -> Vec<Ring> {
    generate_rings_with_radius(count, spacing, curve, RING_RADIUS)
}

/// Generate the ring sequence with a custom ring radius
pub fn generate_rings_with_radius(count: usize, spacing: f32, curve: f32, radius: f32) -> Vec<Ring> {
    ring_centers(count, spacing, curve)
        .into_iter()
        .enumerate()
        .map(|(index, center)| Ring {
            index,
            center,
            normal: Vec3::Z,
            radius,
        })
        .collect()
}

/// Data-driven description of a course
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseLayout {
    pub ring_count: usize,
    pub ring_spacing: f32,
    pub ring_curve: f32,
    pub ring_radius: f32,
    pub wind_zones: Vec<WindZone>,
    pub obstacles: Vec<Obstacle>,
}

impl Default for CourseLayout {
    fn default() -> Self {
        use std::f32::consts::{FRAC_PI_2, PI};

        Self {
            ring_count: RING_COUNT,
            ring_spacing: RING_SPACING,
            ring_curve: RING_CURVE,
            ring_radius: RING_RADIUS,
            wind_zones: vec![
                WindZone {
                    center: Vec3::new(10.0, 18.0, 30.0),
                    half_extents: Vec3::new(8.0, 6.0, 10.0),
                    wind: Vec3::new(-2.0, 0.5, 0.0),
                },
                WindZone {
                    center: Vec3::new(-15.0, 20.0, 80.0),
                    half_extents: Vec3::new(10.0, 5.0, 12.0),
                    wind: Vec3::new(1.5, -0.3, -0.5),
                },
            ],
            obstacles: vec![
                Obstacle {
                    center: Vec3::new(5.0, 19.0, 40.0),
                    period: 6.0,
                    phase: 0.0,
                    orbit_radius: 5.0,
                },
                Obstacle {
                    center: Vec3::new(-8.0, 21.0, 70.0),
                    period: 8.0,
                    phase: FRAC_PI_2,
                    orbit_radius: 6.0,
                },
                Obstacle {
                    center: Vec3::new(0.0, 17.0, 100.0),
                    period: 5.0,
                    phase: PI,
                    orbit_radius: 4.0,
                },
            ],
        }
    }
}

/// A validated, immutable course
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    rings: Vec<Ring>,
    wind_zones: Vec<WindZone>,
    obstacles: Vec<Obstacle>,
}

impl Course {
    /// Validate a layout and generate its rings
    pub fn build(layout: &CourseLayout) -> Result<Self, ConfigError> {
        if !(layout.ring_spacing.is_finite() && layout.ring_curve.is_finite()) {
            return Err(ConfigError::NonFinite("ring generator parameters"));
        }
        require_positive("ring radius", layout.ring_radius)?;

        for (index, zone) in layout.wind_zones.iter().enumerate() {
            zone.validate(index)?;
        }
        for (index, obstacle) in layout.obstacles.iter().enumerate() {
            obstacle.validate(index)?;
        }

        let rings = generate_rings_with_radius(
            layout.ring_count,
            layout.ring_spacing,
            layout.ring_curve,
            layout.ring_radius,
        );

        log::info!(
            "Course built: {} rings, {} wind zones, {} obstacles",
            rings.len(),
            layout.wind_zones.len(),
            layout.obstacles.len()
        );

        Ok(Self {
            rings,
            wind_zones: layout.wind_zones.clone(),
            obstacles: layout.obstacles.clone(),
        })
    }

    /// Assemble a course from explicit parts (rings are re-validated and
    /// their indices must be unique)
    pub fn from_parts(
        rings: Vec<Ring>,
        wind_zones: Vec<WindZone>,
        obstacles: Vec<Obstacle>,
    ) -> Result<Self, ConfigError> {
        let rings = rings
            .into_iter()
            .map(|r| Ring::new(r.index, r.center, r.normal, r.radius))
            .collect::<Result<Vec<_>, _>>()?;
        let mut seen = BTreeSet::new();
        for ring in &rings {
            if !seen.insert(ring.index) {
                return Err(ConfigError::DuplicateRing { index: ring.index });
            }
        }
        for (index, zone) in wind_zones.iter().enumerate() {
            zone.validate(index)?;
        }
        for (index, obstacle) in obstacles.iter().enumerate() {
            obstacle.validate(index)?;
        }
        Ok(Self {
            rings,
            wind_zones,
            obstacles,
        })
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn wind_zones(&self) -> &[WindZone] {
        &self.wind_zones
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_rings_is_pure() {
        let a = generate_rings(12, 14.0, 0.25);
        let b = generate_rings(12, 14.0, 0.25);
        assert_eq!(a.len(), 12);
        assert_eq!(a, b);
        for (i, ring) in a.iter().enumerate() {
            assert_eq!(ring.index, i);
            assert_eq!(ring.normal, Vec3::Z);
            assert_eq!(ring.radius, RING_RADIUS);
        }
    }

    #[test]
    fn test_single_ring_at_origin() {
        let rings = generate_rings(1, 99.0, 3.0);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].center, Vec3::new(0.0, 15.0, 0.0));
    }

    #[test]
    fn test_empty_course() {
        assert!(generate_rings(0, 14.0, 0.25).is_empty());
    }

    #[test]
    fn test_last_ring_at_course_length() {
        let rings = generate_rings(12, 14.0, 0.25);
        let last = rings.last().map(|r| r.center.z);
        assert_eq!(last, Some(12.0 * 14.0));

        // Second ring: t = 168 / 11
        let t = 168.0_f32 / 11.0;
        let expected = Vec3::new((t * 0.25).sin() * 25.0, 15.0 + (t * 0.2).sin() * 5.0, t);
        assert!((rings[1].center - expected).length() < 1e-4);
    }

    #[test]
    fn test_ring_new_rejects_zero_normal() {
        let err = Ring::new(0, Vec3::ZERO, Vec3::ZERO, 4.0);
        assert!(matches!(err, Err(ConfigError::DegenerateRingNormal)));

        let ring = Ring::new(0, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 4.0).unwrap();
        assert_eq!(ring.normal, Vec3::Z);
    }

    #[test]
    fn test_build_default_layout() {
        let course = Course::build(&CourseLayout::default()).unwrap();
        assert_eq!(course.rings().len(), RING_COUNT);
        assert_eq!(course.wind_zones().len(), 2);
        assert_eq!(course.obstacles().len(), 3);
    }

    #[test]
    fn test_build_rejects_bad_zone() {
        let mut layout = CourseLayout::default();
        layout.wind_zones[1].half_extents.y = 0.0;
        let err = Course::build(&layout).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WindZoneExtent { index: 1, axis: 'y', .. }
        ));
    }

    #[test]
    fn test_build_rejects_bad_obstacle() {
        let mut layout = CourseLayout::default();
        layout.obstacles[2].period = -1.0;
        assert!(matches!(
            Course::build(&layout),
            Err(ConfigError::ObstaclePeriod { index: 2, .. })
        ));
    }

    #[test]
    fn test_from_parts_rejects_duplicate_index() {
        let mut rings = generate_rings(3, 14.0, 0.25);
        assert!(Course::from_parts(rings.clone(), Vec::new(), Vec::new()).is_ok());

        rings[2].index = 1;
        assert!(matches!(
            Course::from_parts(rings, Vec::new(), Vec::new()),
            Err(ConfigError::DuplicateRing { index: 1 })
        ));
    }
}
