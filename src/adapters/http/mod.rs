//! HTTP adapters for the scoring and URL extraction services.

pub mod scorer;
pub mod url_extractor;

pub use scorer::HttpAnalysisScorer;
pub use url_extractor::HttpUrlExtractor;
