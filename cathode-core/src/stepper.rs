use crate::apparatus::Apparatus;
use crate::config::FieldConfig;
use crate::field::FieldGenerator;
use crate::particle::Particle;
use crate::runtime::FrameInputs;

/// Collector activity observed while stepping one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub substeps: u32,
    /// Particle-substeps spent past the collector threshold
    pub past_threshold: usize,
    /// Particle-substeps spent pinned on the screen
    pub caught: usize,
}

/// Time at which substep `index` samples the fields
pub fn substep_time(inputs: FrameInputs, substeps_per_frame: u32, index: u32) -> f64 {
    inputs.elapsed + (inputs.delta / substeps_per_frame as f64) * index as f64
}

/// Advance every particle through one visual frame.
///
/// `config` must already be validated. Nothing is removed here: particles
/// that die mid-frame keep being stepped until the population prunes them.
pub fn step_frame(
    particles: &mut [Particle],
    inputs: FrameInputs,
    config: FieldConfig,
    apparatus: &Apparatus,
) -> StepReport {
    let substeps = config.substeps_per_frame;
    let vertical = FieldGenerator::vertical(
        apparatus.vertical_plates,
        config.vertical.gain,
        config.vertical.frequency,
    );
    let horizontal = FieldGenerator::horizontal(
        apparatus.horizontal_plates,
        config.horizontal.gain,
        config.horizontal.frequency,
        config.phase_offset_radians,
        substeps,
    );
    let collector = &apparatus.collector;

    let mut report = StepReport {
        substeps,
        ..StepReport::default()
    };

    for i in 0..substeps {
        let time = substep_time(inputs, substeps, i);

        for particle in particles.iter_mut() {
            let pos = particle.position();
            if vertical.is_active(pos) {
                particle.apply_force(vertical.force(time, pos));
            }
            if horizontal.is_active(pos) {
                particle.apply_force(horizontal.force(time, pos));
            }

            if collector.is_past(pos) {
                particle.decay();
                report.past_threshold += 1;
                if collector.covers(pos) {
                    particle.pin_at(collector.pinned_x());
                    report.caught += 1;
                }
            }

            particle.integrate();
        }
    }

    report
}
