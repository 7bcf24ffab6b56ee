//! Fixed tube geometry: the gun, both plate pairs and the collector screen

use crate::field::PlateExtent;
use crate::particle::Particle;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Distance past the collector threshold at which caught particles are pinned
pub const PIN_OFFSET: f64 = 0.001;

/// Electron gun: where particles appear and how fast they leave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gun {
    pub emission_point: DVec3,
    /// Displacement per substep
    pub initial_velocity: DVec3,
}

impl Default for Gun {
    fn default() -> Self {
        Self {
            emission_point: DVec3::new(-4.0, 0.0, 0.0),
            initial_velocity: DVec3::new(0.025, 0.0, 0.0),
        }
    }
}

impl Gun {
    pub fn emit(&self) -> Particle {
        Particle::new(self.emission_point, self.initial_velocity)
    }
}

/// Target screen across the beam axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collector {
    /// Beam-axis position past which particles start to fade
    pub threshold_x: f64,
    pub half_height: f64,
    pub half_depth: f64,
}

impl Default for Collector {
    fn default() -> Self {
        Self {
            threshold_x: 4.0,
            half_height: 3.0,
            half_depth: 3.0,
        }
    }
}

impl Collector {
    pub fn is_past(&self, pos: DVec3) -> bool {
        pos.x > self.threshold_x
    }

    /// Transverse position lies on the screen (open rectangle)
    pub fn covers(&self, pos: DVec3) -> bool {
        pos.y > -self.half_height
            && pos.y < self.half_height
            && pos.z > -self.half_depth
            && pos.z < self.half_depth
    }

    pub fn pinned_x(&self) -> f64 {
        self.threshold_x + PIN_OFFSET
    }
}

/// Complete tube layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Apparatus {
    pub gun: Gun,
    pub vertical_plates: PlateExtent,
    pub horizontal_plates: PlateExtent,
    pub collector: Collector,
}

impl Default for Apparatus {
    fn default() -> Self {
        Self {
            gun: Gun::default(),
            vertical_plates: PlateExtent::new(-2.0, 1.1),
            horizontal_plates: PlateExtent::new(0.0, 1.1),
            collector: Collector::default(),
        }
    }
}
