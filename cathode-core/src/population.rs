use crate::apparatus::Apparatus;
use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::runtime::FrameInputs;
use crate::stepper::{step_frame, StepReport};

/// Bookkeeping from one `tick`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub pruned: usize,
    pub spawned: usize,
    pub live: usize,
    pub step: StepReport,
}

/// The live beam, oldest particle first
#[derive(Debug, Clone, Default)]
pub struct Population {
    particles: Vec<Particle>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit set of particles instead of an empty tube
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every particle; the next tick still emits one
    pub fn clear(&mut self) {
        log::debug!("clearing {} particles", self.particles.len());
        self.particles.clear();
    }

    /// Step the frame, prune the dead, then emit one particle from the gun.
    ///
    /// `config` must already be validated.
    pub fn tick(&mut self, inputs: FrameInputs, config: FieldConfig, apparatus: &Apparatus) -> TickReport {
        let step = step_frame(&mut self.particles, inputs, config, apparatus);

        let before = self.particles.len();
        self.particles.retain(|p| !p.is_dead());
        let pruned = before - self.particles.len();

        self.particles.push(apparatus.gun.emit());

        TickReport {
            pruned,
            spawned: 1,
            live: self.particles.len(),
            step,
        }
    }
}
