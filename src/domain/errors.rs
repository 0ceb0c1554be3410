//! Domain errors for the live analysis client.

use thiserror::Error;

/// Domain-level errors raised by ports and core services.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Scoring failed: {0}")]
    ScoringFailed(String),

    #[error("URL extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(i64),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
