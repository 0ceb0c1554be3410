use serde::{Deserialize, Serialize};

use super::history::HISTORY_CAPACITY;

/// Main configuration structure for Veritas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Scoring service connection
    #[serde(default)]
    pub scorer: ScorerConfig,

    /// URL extraction service connection
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Edit debounce behaviour
    #[serde(default)]
    pub debounce: DebounceConfig,

    /// History persistence
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scoring service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScorerConfig {
    /// Base URL; requests go to `{base_url}/predict`
    #[serde(default = "default_service_url")]
    pub base_url: String,

    /// Per-request timeout. A timed-out request counts as a failed one.
    #[serde(default = "default_scorer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_scorer_timeout_secs() -> u64 {
    30
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            base_url: default_service_url(),
            timeout_secs: default_scorer_timeout_secs(),
        }
    }
}

/// URL extraction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExtractorConfig {
    /// Base URL; requests go to `{base_url}/scan-url`
    #[serde(default = "default_service_url")]
    pub base_url: String,

    #[serde(default = "default_extractor_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_extractor_timeout_secs() -> u64 {
    15
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: default_service_url(),
            timeout_secs: default_extractor_timeout_secs(),
        }
    }
}

/// Debounce configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DebounceConfig {
    /// Quiet period after the last edit before analysis fires
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,

    /// Whether edits schedule analysis at all
    #[serde(default = "default_true")]
    pub auto_analyze: bool,
}

const fn default_quiet_period_ms() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
            auto_analyze: default_true(),
        }
    }
}

/// History persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistoryConfig {
    /// Path to `SQLite` database file holding the history blob
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Maximum number of entries kept (1-100)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_database_path() -> String {
    ".veritas/veritas.db".to_string()
}

const fn default_capacity() -> usize {
    HISTORY_CAPACITY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            capacity: default_capacity(),
        }
    }
}

impl HistoryConfig {
    /// `sqlx` connection URL for the configured path.
    pub fn database_url(&self) -> String {
        if self.database_path.starts_with("sqlite:") {
            self.database_path.clone()
        } else {
            format!("sqlite:{}", self.database_path)
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
