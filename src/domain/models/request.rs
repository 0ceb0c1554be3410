use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonic identifier of an analysis attempt, assigned at issue time.
pub type SequenceNumber = u64;

/// An issued analysis attempt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub sequence: SequenceNumber,
    pub text_snapshot: String,
    /// Document version the snapshot was taken at.
    pub document_version: u64,
    pub issued_at: DateTime<Utc>,
}

impl AnalysisRequest {
    pub fn new(sequence: SequenceNumber, text_snapshot: String, document_version: u64) -> Self {
        Self {
            sequence,
            text_snapshot,
            document_version,
            issued_at: Utc::now(),
        }
    }
}
