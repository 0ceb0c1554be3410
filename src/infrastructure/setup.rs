//! Veritas setup and bootstrap
//!
//! Handles project initialization:
//! - Configuration directory creation
//! - Default config file creation
//! - Database migrations
//!
//! and wiring the live analysis engine from a loaded [`Config`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::http::{HttpAnalysisScorer, HttpUrlExtractor};
use crate::adapters::memory::InMemoryKeyValueStore;
use crate::adapters::sqlite::{initialize_database, SqliteKeyValueStore};
use crate::domain::models::{Config, HistoryConfig};
use crate::domain::ports::KeyValueStore;
use crate::infrastructure::config::PROJECT_DIR;
use crate::services::{EngineHandle, EngineSettings, HistoryCache, LiveAnalysisEngine};

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Veritas Configuration
# Override settings by editing this file, adding .veritas/local.yaml,
# or setting environment variables with the VERITAS_ prefix
#
# Example environment variables:
#   export VERITAS_SCORER__BASE_URL=http://localhost:8000
#   export VERITAS_DEBOUNCE__QUIET_PERIOD_MS=500
#   export VERITAS_LOGGING__LEVEL=debug

# Scoring service (POST {base_url}/predict)
scorer:
  base_url: "http://localhost:8000"
  # A request that takes longer counts as failed
  timeout_secs: 30

# URL extraction service (POST {base_url}/scan-url)
extractor:
  base_url: "http://localhost:8000"
  timeout_secs: 15

# Live analysis while typing
debounce:
  # Quiet period after the last edit before analysis runs
  quiet_period_ms: 1000
  # Set to false to analyze only on :analyze
  auto_analyze: true

# Analysis history
history:
  # Path to SQLite database file (project-local)
  database_path: ".veritas/veritas.db"
  # Number of entries kept (1-100)
  capacity: 10

# Logging configuration
logging:
  # Log level: trace, debug, info, warn, error
  level: "warn"
  # Log format: json, pretty
  format: "pretty"
  # Uncomment to also write rolling JSON logs
  # log_dir: ".veritas/logs"
  # rotation: daily
"#;

/// Setup paths and directories
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::in_dir(current_dir))
    }

    /// Setup paths rooted at `root`
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let config_dir = root.as_ref().join(PROJECT_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("veritas.db"),
            config_dir,
        }
    }

    /// Check if Veritas is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")
}

/// Create the default configuration file. Returns whether it was written.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Create the database and run migrations
pub async fn run_migrations(paths: &SetupPaths) -> Result<()> {
    let db_url = format!("sqlite:{}", paths.database_file.display());
    let pool = initialize_database(&db_url)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;
    Ok(())
}

/// Open the persistent history store.
///
/// History is a convenience, so an unusable database degrades to an
/// in-memory store for this session instead of failing the command.
pub async fn open_history_store(config: &HistoryConfig) -> Arc<dyn KeyValueStore> {
    match initialize_database(&config.database_url()).await {
        Ok(pool) => Arc::new(SqliteKeyValueStore::new(pool)),
        Err(e) => {
            tracing::warn!(
                path = %config.database_path,
                error = %e,
                "history database unavailable, history will not be saved"
            );
            Arc::new(InMemoryKeyValueStore::new())
        }
    }
}

/// Build the HTTP adapters and start the engine with persisted history.
pub async fn bootstrap(config: &Config) -> Result<EngineHandle> {
    let scorer = HttpAnalysisScorer::new(&config.scorer).context("Failed to build scoring client")?;
    let extractor = HttpUrlExtractor::new(&config.extractor).context("Failed to build URL extraction client")?;

    let store = open_history_store(&config.history).await;
    let history = HistoryCache::load(store, config.history.capacity).await;

    Ok(LiveAnalysisEngine::spawn(
        EngineSettings::from_config(config),
        Arc::new(scorer),
        Arc::new(extractor),
        history,
    ))
}
