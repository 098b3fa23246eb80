use std::time::Duration;

use floodqueue::{Config, ConfigError};
use serde::Deserialize;
use thiserror::Error;

/// On-disk representation of the `agent.*` / `buflength` / `events_persec`
/// configuration keys, loaded from TOML or JSON.
///
/// Kept separate from [`Config`]: `RawConfig` only knows how to
/// deserialize, `Config::validate` is the single place bounds are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawConfig {
    pub warn_level: u8,
    pub normal_level: u8,
    pub tolerance_secs: u64,
    pub buflength: usize,
    pub events_persec: f64,
    #[serde(default = "default_min_capacity")]
    pub min_capacity: usize,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
}

fn default_min_capacity() -> usize {
    64
}

fn default_max_capacity() -> usize {
    262_144
}

/// Errors loading or validating an on-disk configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration failed validation: {0}")]
    Invalid(#[from] ConfigError),
}

impl RawConfig {
    /// Parses `text` as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Toml`] on malformed input.
    pub fn from_toml(text: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Parses `text` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Json`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Converts to a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Invalid`] if any bound from
    /// `Config::validate` is violated.
    pub fn into_config(self) -> Result<Config, ConfigLoadError> {
        let config = Config {
            warn_level: self.warn_level,
            normal_level: self.normal_level,
            tolerance: Duration::from_secs(self.tolerance_secs),
            usable: self.buflength,
            events_per_sec: self.events_persec,
            min_capacity: self.min_capacity,
            max_capacity: self.max_capacity,
        };
        Ok(config.validate()?)
    }
}
