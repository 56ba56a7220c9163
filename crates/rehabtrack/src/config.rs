//! Configuration management for rehabtrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rehabtrack";

/// Default registry document name.
const REGISTRY_FILE_NAME: &str = "user_data.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `REHABTRACK_`, `__` between levels)
/// 2. TOML config file at `~/.config/rehabtrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry configuration.
    pub registry: RegistryConfig,
    /// Patient registration rules.
    pub patients: PatientConfig,
}

/// Registry-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Path to the registry document.
    /// Defaults to `~/.local/share/rehabtrack/user_data.json`
    pub path: Option<PathBuf>,
    /// Reject doctor registrations whose doctor id is already taken.
    /// Off by default, in which case a patient registering under a shared id
    /// is added to every matching doctor's roster.
    pub unique_doctor_ids: bool,
}

/// Patient registration rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientConfig {
    /// Youngest accepted age.
    pub min_age: u8,
    /// Oldest accepted age.
    pub max_age: u8,
}

impl Default for PatientConfig {
    fn default() -> Self {
        Self {
            min_age: 10,
            max_age: 100,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("REHABTRACK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.patients.max_age == 0 {
            return Err(Error::ConfigValidation {
                message: "max_age must be greater than 0".to_string(),
            });
        }

        if self.patients.min_age > self.patients.max_age {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_age ({}) cannot be greater than max_age ({})",
                    self.patients.min_age, self.patients.max_age
                ),
            });
        }

        Ok(())
    }

    /// Get the registry path, resolving defaults if not set.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.registry
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(REGISTRY_FILE_NAME))
    }
}
