use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project directory holding config files and the database.
pub const PROJECT_DIR: &str = ".veritas";

/// Prefix for environment overrides, e.g. `VERITAS_SCORER__BASE_URL`.
pub const ENV_PREFIX: &str = "VERITAS_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} base_url cannot be empty")]
    EmptyServiceUrl(&'static str),

    #[error("Invalid {0} timeout_secs: must be greater than 0")]
    InvalidTimeout(&'static str),

    #[error("Invalid quiet_period_ms: must be greater than 0")]
    InvalidQuietPeriod,

    #[error("Invalid history capacity: {0}. Must be between 1 and 100")]
    InvalidHistoryCapacity(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .veritas/config.yaml (project config, created by init)
    /// 3. .veritas/local.yaml (project local overrides, optional)
    /// 4. Environment variables (VERITAS_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`load`](Self::load) with the project rooted at `root`.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let project = root.as_ref().join(PROJECT_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(project.join("config.yaml")))
            .merge(Yaml::file(project.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.scorer.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyServiceUrl("scorer"));
        }
        if config.scorer.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("scorer"));
        }
        if config.extractor.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyServiceUrl("extractor"));
        }
        if config.extractor.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("extractor"));
        }

        if config.debounce.quiet_period_ms == 0 {
            return Err(ConfigError::InvalidQuietPeriod);
        }

        if config.history.capacity == 0 || config.history.capacity > 100 {
            return Err(ConfigError::InvalidHistoryCapacity(config.history.capacity));
        }
        if config.history.database_path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
