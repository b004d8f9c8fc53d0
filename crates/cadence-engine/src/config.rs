use std::path::PathBuf;

use cadence_srs::{DEFAULT_MAX_INTERVAL_DAYS, SchedulerConfig};
use cadence_store::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use validator::Validate;

use crate::error::ConfigError;

/// Prefix of every environment variable read by [`EngineConfig::from_env`].
pub const ENV_PREFIX: &str = "CADENCE_";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Engine configuration.
///
/// Every field has a default, so an empty environment yields a working engine.
///
/// # Environment Variables
/// - `CADENCE_ENVIRONMENT`: `development` (default) or `production`
/// - `CADENCE_DATA_PATH`: snapshot file, default `cadence.json`
/// - `CADENCE_HISTORY_CAPACITY`: finished sessions kept, 1-1000, default 100
/// - `CADENCE_MAX_INTERVAL_DAYS`: interval cap, 1-36500, default 365
/// - `CADENCE_RNG_SEED`: fixes content selection order, random when unset
/// - `CADENCE_LOG_FILTER`: `EnvFilter` directives replacing the per-environment default
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Validate)]
pub struct EngineConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_history_capacity")]
    #[validate(range(min = 1, max = 1000))]
    pub history_capacity: usize,
    #[serde(default = "default_max_interval_days")]
    #[validate(range(min = 1, max = 36500))]
    pub max_interval_days: u32,
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("cadence.json")
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

const fn default_max_interval_days() -> u32 {
    DEFAULT_MAX_INTERVAL_DAYS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            data_path: default_data_path(),
            history_capacity: default_history_capacity(),
            max_interval_days: default_max_interval_days(),
            rng_seed: None,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = envy::prefixed(ENV_PREFIX).from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Self::from_env`] but reads from the given `(KEY, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub const fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.max_interval_days)
    }
}
