//! Scoring service port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::AnalysisResult;

/// Turns raw text into a verdict.
///
/// Implementations are called from spawned tasks, possibly several at once,
/// and must not assume calls complete in the order they were made.
#[async_trait]
pub trait AnalysisScorer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Score `text`. Any non-success outcome maps to
    /// [`DomainError::ScoringFailed`](crate::domain::DomainError::ScoringFailed).
    async fn score(&self, text: &str) -> DomainResult<AnalysisResult>;
}
