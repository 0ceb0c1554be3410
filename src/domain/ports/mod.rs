//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - AnalysisScorer: remote verdict service
//! - UrlExtractor: remote URL-to-text service
//! - KeyValueStore: persistence for the history blob
//!
//! The engine depends only on these traits, never on reqwest or sqlx.

pub mod key_value_store;
pub mod scorer;
pub mod url_extractor;

pub use key_value_store::KeyValueStore;
pub use scorer::AnalysisScorer;
pub use url_extractor::{ExtractedPage, UrlExtractor};
