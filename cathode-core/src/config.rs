//! Tunable deflection parameters and their validation
//!
//! `FieldConfig` is a plain `Copy` value: callers hand the stepper a fresh
//! snapshot every frame, so a control surface editing the values between
//! frames can never be observed half-applied.

use crate::apparatus::Apparatus;
use crate::field::Deflection;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors caught before anything reaches the stepper
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("substeps per frame must be at least 1")]
    InvalidSubsteps,
    #[error("{channel} gain must be a non-negative number, got {value}")]
    NegativeGain { channel: &'static str, value: f64 },
    #[error("{channel} frequency must be a positive number, got {value}")]
    InvalidFrequency { channel: &'static str, value: f64 },
    #[error("phase offset must be finite, got {0}")]
    NonFinitePhase(f64),
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Gain and frequency of one plate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub gain: f64,
    /// Cycles per second of simulation time
    pub frequency: f64,
}

impl ChannelConfig {
    pub fn new(gain: f64, frequency: f64) -> Self {
        Self { gain, frequency }
    }

    fn validate(&self, deflection: Deflection) -> Result<(), ConfigError> {
        // NaN fails both comparisons
        if !(self.gain >= 0.0 && self.gain.is_finite()) {
            return Err(ConfigError::NegativeGain {
                channel: deflection.name(),
                value: self.gain,
            });
        }
        if !(self.frequency > 0.0 && self.frequency.is_finite()) {
            return Err(ConfigError::InvalidFrequency {
                channel: deflection.name(),
                value: self.frequency,
            });
        }
        Ok(())
    }
}

/// Snapshot of the field tunables for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub vertical: ChannelConfig,
    pub horizontal: ChannelConfig,
    /// Horizontal channel only
    pub phase_offset_radians: f64,
    pub substeps_per_frame: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            vertical: ChannelConfig::new(0.8, 0.5),
            horizontal: ChannelConfig::new(0.8, 0.75),
            phase_offset_radians: 0.0,
            substeps_per_frame: 1,
        }
    }
}

impl FieldConfig {
    /// Both gains at zero: the beam flies straight
    pub fn undeflected() -> Self {
        let mut config = Self::default();
        config.vertical.gain = 0.0;
        config.horizontal.gain = 0.0;
        config
    }

    pub fn with_substeps(mut self, substeps_per_frame: u32) -> Self {
        self.substeps_per_frame = substeps_per_frame;
        self
    }

    pub fn channel(&self, deflection: Deflection) -> ChannelConfig {
        match deflection {
            Deflection::Vertical => self.vertical,
            Deflection::Horizontal => self.horizontal,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.substeps_per_frame < 1 {
            return Err(ConfigError::InvalidSubsteps);
        }
        self.vertical.validate(Deflection::Vertical)?;
        self.horizontal.validate(Deflection::Horizontal)?;
        if !self.phase_offset_radians.is_finite() {
            return Err(ConfigError::NonFinitePhase(self.phase_offset_radians));
        }
        Ok(())
    }
}

/// On-disk configuration: tunables plus tube geometry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub field: FieldConfig,
    pub apparatus: Apparatus,
}

/// Parse and validate a JSON config
pub fn parse_config(source: &str) -> Result<ScopeConfig, ConfigError> {
    let config: ScopeConfig = serde_json::from_str(source)?;
    config.field.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<ScopeConfig, ConfigError> {
    let source = fs::read_to_string(path)?;
    parse_config(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(FieldConfig::default().validate().is_ok());
        assert!(FieldConfig::undeflected().validate().is_ok());
    }

    #[test]
    fn zero_substeps_rejected() {
        let config = FieldConfig::default().with_substeps(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSubsteps)));
    }

    #[test]
    fn negative_and_nan_gain_rejected() {
        let mut config = FieldConfig::default();
        config.horizontal.gain = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeGain { channel: "horizontal", .. })
        ));

        config.horizontal.gain = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_frequency_rejected() {
        let mut config = FieldConfig::default();
        config.vertical.frequency = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFrequency { channel: "vertical", .. })
        ));
    }

    #[test]
    fn infinite_phase_rejected() {
        let mut config = FieldConfig::default();
        config.phase_offset_radians = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::NonFinitePhase(_))));
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ScopeConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = parse_config(
            r#"{
                "field": { "substeps_per_frame": 8, "phase_offset_radians": 1.5 },
                "apparatus": { "collector": { "threshold_x": 5.0 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.field.substeps_per_frame, 8);
        assert_eq!(config.field.phase_offset_radians, 1.5);
        assert_eq!(config.field.vertical, FieldConfig::default().vertical);
        assert_eq!(config.apparatus.collector.threshold_x, 5.0);
        assert_eq!(config.apparatus.collector.half_height, 3.0);
    }

    #[test]
    fn invalid_json_values_rejected() {
        let result = parse_config(r#"{ "field": { "substeps_per_frame": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidSubsteps)));

        let result = parse_config("{ not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }
}
