//! Region-local wind
//!
//! A wind field is a list of axis-aligned zones. Zones overlap freely and
//! their winds add up.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::box_contains;
use crate::error::{ConfigError, require_finite};

/// Axis-aligned box imparting a constant acceleration while occupied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindZone {
    pub center: Vec3,
    /// Half size per axis (all positive)
    #[serde(alias = "half_size")]
    pub half_extents: Vec3,
    /// Acceleration added to anything inside
    pub wind: Vec3,
}

impl WindZone {
    pub fn new(center: Vec3, half_extents: Vec3, wind: Vec3) -> Result<Self, ConfigError> {
        let zone = Self {
            center,
            half_extents,
            wind,
        };
        zone.validate(0)?;
        Ok(zone)
    }

    /// Check the definition; `index` is only used to label the error
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        require_finite("wind zone center", self.center)?;
        require_finite("wind zone wind", self.wind)?;
        for (axis, value) in ['x', 'y', 'z'].into_iter().zip(self.half_extents.to_array()) {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::WindZoneExtent { index, axis, value });
            }
        }
        Ok(())
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        box_contains(self.center, self.half_extents, position)
    }
}

/// Total wind acceleration at `position`
pub fn sample(position: Vec3, zones: &[WindZone]) -> Vec3 {
    zones
        .iter()
        .filter(|zone| zone.contains(position))
        .fold(Vec3::ZERO, |acc, zone| acc + zone.wind)
}
