//! Veritas - live authenticity analysis for news text
//!
//! Veritas keeps a single editable document, re-scores it against a remote
//! classifier as the user edits, and guarantees that the verdict on screen
//! always belongs to the most recent text that has finished scoring.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Adapters** (`adapters`): HTTP scorer and URL extractor, SQLite and in-memory stores, mocks
//! - **Service Layer** (`services`): Debounce, request sequencing, history and the engine loop
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging, bootstrap
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use veritas::infrastructure::config::ConfigLoader;
//! use veritas::infrastructure::setup::bootstrap;
//! use veritas::domain::models::EditSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let engine = bootstrap(&config).await?;
//!     engine.edit("Council approves park budget", EditSource::Paste).await?;
//!     engine.analyze().await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AnalysisRequest, AnalysisResult, Config, Document, EditSource, HistoryEntry, Label, RewriteStyle,
};
pub use services::{AnalysisView, EngineError, EngineHandle, EngineSettings, LiveAnalysisEngine};
