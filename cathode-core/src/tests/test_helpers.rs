//! Test helper utilities for cathode tests

use crate::apparatus::Apparatus;
use crate::config::{FieldConfig, ScopeConfig};
use crate::particle::Particle;
use crate::population::Population;
use crate::runtime::{get_particle_states, FrameContext, FrameInputs, ParticleState};
use glam::DVec3;

/// Display refresh used by tests that do not care about the exact delta
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Component-wise `approx_eq`
pub fn approx_eq_vec(a: DVec3, b: DVec3, tol: f64) -> bool {
    approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol) && approx_eq(a.z, b.z, tol)
}

/// Default geometry with no field drive and one substep
pub fn undeflected_config() -> ScopeConfig {
    ScopeConfig {
        field: FieldConfig::undeflected(),
        apparatus: Apparatus::default(),
    }
}

/// Tick `population` for `frames` frames of `delta` seconds starting at t = 0
pub fn run_frames(
    population: &mut Population,
    config: FieldConfig,
    apparatus: &Apparatus,
    frames: u64,
    delta: f64,
) {
    for frame in 0..frames {
        let inputs = FrameInputs {
            elapsed: frame as f64 * delta,
            delta,
        };
        population.tick(inputs, config, apparatus);
    }
}

/// Advance a context `frames` times, panicking on any frame error
pub fn advance_frames(ctx: &mut FrameContext, frames: u64, delta: f64) {
    for _ in 0..frames {
        ctx.advance(delta).expect("frame should advance");
    }
}

/// A gun that leaves its particles parked at the emission point
pub fn idle_gun_apparatus() -> Apparatus {
    let mut apparatus = Apparatus::default();
    apparatus.gun.initial_velocity = DVec3::ZERO;
    apparatus
}

/// Single particle population at an explicit state
pub fn single_particle(pos: DVec3, vel: DVec3) -> Population {
    Population::from_particles(vec![Particle::new(pos, vel)])
}

/// Convert a snapshot to JSON for golden comparisons
pub fn snapshot_to_json(population: &Population) -> String {
    let states: Vec<ParticleState> = get_particle_states(population);
    serde_json::to_string_pretty(&states).expect("snapshot should serialize")
}

/// Compare two snapshots with tolerance
pub fn snapshots_approx_equal(a: &[ParticleState], b: &[ParticleState], tol: f64) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            approx_eq_vec(x.pos, y.pos, tol) && approx_eq(x.brightness, y.brightness, tol)
        })
}
