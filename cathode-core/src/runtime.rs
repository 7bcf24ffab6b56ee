//! Frame-driven runtime
//!
//! The host calls `FrameContext::advance` once per display refresh. Each
//! call validates its inputs, runs every substep, prunes, emits, and then
//! moves the clock forward; there is no background work.

use crate::apparatus::Apparatus;
use crate::config::{ConfigError, FieldConfig, ScopeConfig};
use crate::population::{Population, TickReport};
use glam::DVec3;
use serde::Serialize;
use thiserror::Error;

/// Errors from frame inputs that would poison the population
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("{name} must be finite, got {value}")]
    NonFiniteInput { name: &'static str, value: f64 },
    #[error("frame delta must not be negative, got {0}")]
    NegativeDelta(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Clock readings for one frame, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Simulation time at the start of the frame
    pub elapsed: f64,
    /// Time since the previous frame
    pub delta: f64,
}

impl FrameInputs {
    pub fn validate(&self) -> Result<(), FrameError> {
        if !self.elapsed.is_finite() {
            return Err(FrameError::NonFiniteInput {
                name: "elapsed time",
                value: self.elapsed,
            });
        }
        if !self.delta.is_finite() {
            return Err(FrameError::NonFiniteInput {
                name: "frame delta",
                value: self.delta,
            });
        }
        if self.delta < 0.0 {
            return Err(FrameError::NegativeDelta(self.delta));
        }
        Ok(())
    }
}

/// Monotonic simulation clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    elapsed: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Inputs for a frame lasting `delta`, starting now
    pub fn frame(&self, delta: f64) -> FrameInputs {
        FrameInputs {
            elapsed: self.elapsed,
            delta,
        }
    }

    pub fn advance(&mut self, delta: f64) {
        self.elapsed += delta;
    }
}

/// What a renderer needs from one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleState {
    pub pos: DVec3,
    pub brightness: f64,
}

impl ParticleState {
    /// r = g = b = brightness
    pub fn color(&self) -> [f64; 3] {
        [self.brightness; 3]
    }
}

/// Everything needed to drive the tube frame after frame
#[derive(Debug, Clone)]
pub struct FrameContext {
    pub population: Population,
    pub apparatus: Apparatus,
    config: FieldConfig,
    pub clock: SimulationClock,
    pub frame: u64,
}

impl FrameContext {
    pub fn new(config: ScopeConfig) -> Result<Self, ConfigError> {
        config.field.validate()?;
        Ok(Self {
            population: Population::new(),
            apparatus: config.apparatus,
            config: config.field,
            clock: SimulationClock::new(),
            frame: 0,
        })
    }

    pub fn config(&self) -> FieldConfig {
        self.config
    }

    /// Swap in new tunables; an invalid snapshot leaves the old one in place
    pub fn set_config(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config != self.config {
            log::debug!("field config updated: {:?}", config);
        }
        self.config = config;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.population.clear();
    }

    /// Run one visual frame lasting `delta` seconds
    pub fn advance(&mut self, delta: f64) -> Result<TickReport, FrameError> {
        let inputs = self.clock.frame(delta);
        inputs.validate()?;
        self.config.validate()?;

        let report = self.population.tick(inputs, self.config, &self.apparatus);
        self.clock.advance(delta);
        self.frame += 1;

        log::trace!(
            "frame {}: live={} pruned={} caught={} past={}",
            self.frame,
            report.live,
            report.pruned,
            report.step.caught,
            report.step.past_threshold
        );
        Ok(report)
    }

    pub fn snapshot(&self) -> Vec<ParticleState> {
        get_particle_states(&self.population)
    }
}

/// Read-only view of the population for renderers
pub fn get_particle_states(population: &Population) -> Vec<ParticleState> {
    population
        .particles()
        .iter()
        .map(|p| ParticleState {
            pos: p.position(),
            brightness: p.brightness(),
        })
        .collect()
}

/// Totals from a headless run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub elapsed: f64,
    pub live: usize,
    pub pruned: usize,
    pub peak_live: usize,
    /// Particles sitting on the screen after the last frame
    pub on_screen: usize,
}

/// Drive a fresh context for `frames` frames of `delta` seconds each
pub fn run_frames(
    config: ScopeConfig,
    frames: u64,
    delta: f64,
) -> Result<(FrameContext, RunSummary), FrameError> {
    let mut ctx = FrameContext::new(config)?;
    let mut summary = RunSummary::default();

    for _ in 0..frames {
        let report = ctx.advance(delta)?;
        summary.pruned += report.pruned;
        summary.peak_live = summary.peak_live.max(report.live);
    }

    let pinned_x = ctx.apparatus.collector.pinned_x();
    summary.frames = ctx.frame;
    summary.elapsed = ctx.clock.elapsed();
    summary.live = ctx.population.len();
    summary.on_screen = ctx
        .population
        .particles()
        .iter()
        .filter(|p| p.position().x == pinned_x && p.velocity() == DVec3::ZERO)
        .count();

    Ok((ctx, summary))
}
