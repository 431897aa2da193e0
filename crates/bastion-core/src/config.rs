//! Runtime configuration for a simulation run.
//!
//! Every field defaults to the matching constant in [`crate::constants`].
//! A TOML document may override any subset of fields:
//!
//! ```toml
//! seed = 7
//! wave_complete_delay_ms = 1500.0
//!
//! [trail]
//! enemy_probability = 0.5
//! ```
//!
//! Game rules (radii, scores, the wave curve) are deliberately not
//! configurable here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed and same inputs give the same simulation.
    pub seed: u64,
    /// Pause between a completed wave and the next wave (or victory).
    pub wave_complete_delay_ms: f64,
    pub trail: TrailConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            wave_complete_delay_ms: WAVE_COMPLETE_DELAY_MS,
            trail: TrailConfig::default(),
        }
    }
}

/// Per-tick probability that a missile drops a trail point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub player_probability: f64,
    pub enemy_probability: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            player_probability: PLAYER_TRAIL_PROBABILITY,
            enemy_probability: ENEMY_TRAIL_PROBABILITY,
        }
    }
}

impl SimConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("trail.player_probability", self.trail.player_probability)?;
        check_probability("trail.enemy_probability", self.trail.enemy_probability)?;
        if self.wave_complete_delay_ms.is_nan() || self.wave_complete_delay_ms < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "wave_complete_delay_ms",
                value: self.wave_complete_delay_ms,
                expected: ">= 0",
            });
        }
        Ok(())
    }

    /// Force every field into its valid range.
    ///
    /// Probabilities are clamped to `0.0..=1.0` (NaN falls back to the
    /// default) and a NaN or negative delay becomes zero. A config that
    /// already passes [`SimConfig::validate`] comes back unchanged.
    pub fn sanitized(mut self) -> Self {
        let defaults = TrailConfig::default();
        self.trail.player_probability =
            clamp_probability(self.trail.player_probability, defaults.player_probability);
        self.trail.enemy_probability =
            clamp_probability(self.trail.enemy_probability, defaults.enemy_probability);
        if self.wave_complete_delay_ms.is_nan() || self.wave_complete_delay_ms < 0.0 {
            self.wave_complete_delay_ms = 0.0;
        }
        self
    }
}

fn clamp_probability(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "0.0..=1.0",
        })
    }
}
