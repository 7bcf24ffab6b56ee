//! Oscillating deflection fields
//!
//! Each plate pair drives a sinusoidal force along one transverse axis,
//! but only while a particle is between the plates. The horizontal pair
//! samples the clock slightly later than the vertical pair to stand in for
//! the beam's transit time between them.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Force scale applied to `sin(..) * gain`
pub const FIELD_AMPLITUDE: f64 = 1.0 / 4000.0;

/// Frame period the transit delay is expressed against (60 Hz display)
pub const NOMINAL_FRAME_PERIOD: f64 = 1.0 / 60.0;

/// Fraction of a nominal frame the beam spends between the plate pairs
pub const TRAVEL_DELAY_FRAME_FRACTION: f64 = 0.5;

/// Span of a plate pair along the beam (x) axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateExtent {
    pub center_x: f64,
    pub half_width: f64,
}

impl PlateExtent {
    pub fn new(center_x: f64, width: f64) -> Self {
        Self {
            center_x,
            half_width: width / 2.0,
        }
    }

    pub fn start(&self) -> f64 {
        self.center_x - self.half_width
    }

    pub fn end(&self) -> f64 {
        self.center_x + self.half_width
    }

    /// Strictly between the plate edges; a particle exactly on an edge feels nothing
    pub fn contains(&self, x: f64) -> bool {
        x > self.start() && x < self.end()
    }
}

/// Transverse axis a plate pair deflects along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deflection {
    /// Plates above/below the beam, pushing along y
    Vertical,
    /// Plates left/right of the beam, pushing along z
    Horizontal,
}

impl Deflection {
    pub fn axis(self) -> DVec3 {
        match self {
            Deflection::Vertical => DVec3::Y,
            Deflection::Horizontal => DVec3::Z,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Deflection::Vertical => "vertical",
            Deflection::Horizontal => "horizontal",
        }
    }
}

/// Clock offset for the horizontal plates.
///
/// The transit time is fixed in wall time, so it shrinks per substep as the
/// substep count grows. A zero count is treated as one.
pub fn travel_delay(substeps_per_frame: u32) -> f64 {
    TRAVEL_DELAY_FRAME_FRACTION * NOMINAL_FRAME_PERIOD / substeps_per_frame.max(1) as f64
}

/// Unit-amplitude drive signal at `time`
pub fn oscillation(time: f64, frequency: f64, phase_offset: f64) -> f64 {
    (TAU * frequency * time + phase_offset).sin()
}

/// One plate pair's field, fixed for the duration of a frame
#[derive(Debug, Clone, Copy)]
pub struct FieldGenerator {
    pub deflection: Deflection,
    pub plates: PlateExtent,
    pub gain: f64,
    pub frequency: f64,
    pub phase_offset: f64,
    /// Added to the simulation time before sampling
    pub time_shift: f64,
}

impl FieldGenerator {
    pub fn vertical(plates: PlateExtent, gain: f64, frequency: f64) -> Self {
        Self {
            deflection: Deflection::Vertical,
            plates,
            gain,
            frequency,
            phase_offset: 0.0,
            time_shift: 0.0,
        }
    }

    pub fn horizontal(
        plates: PlateExtent,
        gain: f64,
        frequency: f64,
        phase_offset: f64,
        substeps_per_frame: u32,
    ) -> Self {
        Self {
            deflection: Deflection::Horizontal,
            plates,
            gain,
            frequency,
            phase_offset,
            time_shift: travel_delay(substeps_per_frame),
        }
    }

    pub fn is_active(&self, pos: DVec3) -> bool {
        self.plates.contains(pos.x)
    }

    /// Force on a particle at `pos` at simulation time `time`
    pub fn force(&self, time: f64, pos: DVec3) -> DVec3 {
        if !self.is_active(pos) {
            return DVec3::ZERO;
        }
        let drive = oscillation(time + self.time_shift, self.frequency, self.phase_offset);
        self.deflection.axis() * (FIELD_AMPLITUDE * drive * self.gain)
    }
}
