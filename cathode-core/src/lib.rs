pub mod apparatus;
pub mod config;
pub mod diagnostics;
pub mod field;
pub mod particle;
pub mod population;
pub mod runtime;
pub mod stepper;

pub use apparatus::{Apparatus, Collector, Gun};
pub use config::{load_config, parse_config, ChannelConfig, ConfigError, FieldConfig, ScopeConfig};
pub use field::{Deflection, FieldGenerator, PlateExtent};
pub use particle::Particle;
pub use population::{Population, TickReport};
pub use runtime::{
    get_particle_states, run_frames, FrameContext, FrameError, FrameInputs, ParticleState,
    RunSummary, SimulationClock,
};
pub use stepper::{step_frame, StepReport};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
