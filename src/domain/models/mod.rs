pub mod analysis;
pub mod config;
pub mod document;
pub mod history;
pub mod request;
pub mod rewrite;

pub use analysis::{AnalysisDetails, AnalysisResult, FlaggedKeyword, Label};
pub use config::{
    Config, DebounceConfig, ExtractorConfig, HistoryConfig, LoggingConfig, ScorerConfig,
};
pub use document::{Document, EditSource};
pub use history::{HistoryEntry, HISTORY_CAPACITY, HISTORY_STORAGE_KEY};
pub use request::{AnalysisRequest, SequenceNumber};
pub use rewrite::RewriteStyle;
