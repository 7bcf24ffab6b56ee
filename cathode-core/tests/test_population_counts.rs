//! Population bookkeeping across ticks

use cathode_core::tests::test_helpers::{run_frames, FRAME_DT};
use cathode_core::{step_frame, Apparatus, FieldConfig, FrameInputs, Particle, Population};
use glam::DVec3;

fn nearly_dead(pos: DVec3) -> Particle {
    let mut p = Particle::new(pos, DVec3::ZERO);
    for _ in 0..999 {
        p.decay();
    }
    p
}

#[test]
fn test_size_after_tick_is_survivors_plus_one() {
    let off_screen = DVec3::new(4.5, 5.0, 0.0);
    let parked = DVec3::new(-3.0, 0.0, 0.0);
    let particles = vec![
        nearly_dead(off_screen),
        Particle::new(parked, DVec3::ZERO),
        nearly_dead(off_screen),
        nearly_dead(parked),
        Particle::new(off_screen, DVec3::ZERO),
    ];
    let mut pop = Population::from_particles(particles);
    let config = FieldConfig::undeflected().with_substeps(2);
    let inputs = FrameInputs { elapsed: 0.0, delta: FRAME_DT };

    let report = pop.tick(inputs, config, &Apparatus::default());

    // only the two nearly dead particles past the threshold die
    assert_eq!(report.pruned, 2);
    assert_eq!(report.spawned, 1);
    assert_eq!(pop.len(), 5 - 2 + 1);
    assert_eq!(report.live, pop.len());
    assert!(pop.particles().iter().all(|p| !p.is_dead()));
}

#[test]
fn test_survivors_keep_spawn_order() {
    let particles: Vec<Particle> = (0..6)
        .map(|i| {
            let x = -3.0 + i as f64 * 0.1;
            if i % 2 == 0 {
                nearly_dead(DVec3::new(x + 8.0, 0.0, 0.0))
            } else {
                Particle::new(DVec3::new(x, 0.0, 0.0), DVec3::ZERO)
            }
        })
        .collect();
    let mut pop = Population::from_particles(particles);
    let inputs = FrameInputs { elapsed: 0.0, delta: FRAME_DT };
    pop.tick(inputs, FieldConfig::undeflected().with_substeps(2), &Apparatus::default());

    let xs: Vec<f64> = pop.particles().iter().map(|p| p.position().x).collect();
    assert_eq!(xs.len(), 4);
    assert!(xs[0] < xs[1] && xs[1] < xs[2]);
    assert_eq!(xs[3], -4.0);
}

#[test]
fn test_steady_state_beam_length() {
    // a particle lives for the flight plus 1000 substeps on the screen
    let mut pop = Population::new();
    let apparatus = Apparatus::default();
    let config = FieldConfig::undeflected();
    run_frames(&mut pop, config, &apparatus, 2000, FRAME_DT);
    let settled = pop.len();

    run_frames(&mut pop, config, &apparatus, 100, FRAME_DT);
    assert_eq!(pop.len(), settled, "one in, one out once the beam is steady");
    assert!(settled > 1000 && settled < 1400);
}

#[test]
fn test_dead_particle_still_stepped_until_frame_end() {
    let vel = DVec3::new(0.1, 0.0, 0.0);
    let mut p = Particle::new(DVec3::new(4.5, 5.0, 0.0), vel);
    for _ in 0..999 {
        p.decay();
    }
    let mut particles = vec![p];
    let inputs = FrameInputs { elapsed: 0.0, delta: FRAME_DT };

    step_frame(&mut particles, inputs, FieldConfig::undeflected().with_substeps(3), &Apparatus::default());

    // dead after the first substep, yet it moved on all three
    let p = &particles[0];
    assert!(p.is_dead());
    assert!((p.position().x - 4.8).abs() < 1e-12);
    assert!((p.brightness() + 0.002).abs() < 1e-9);
}
