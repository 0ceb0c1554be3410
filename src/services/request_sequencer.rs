//! Request sequencing and stale-result suppression.
//!
//! Every submit is stamped with a strictly increasing sequence number at
//! issue time. Responses may complete in any order; a success is accepted
//! only if its sequence is above the highest one accepted so far, and a
//! failure is surfaced only if it belongs to the most recently issued
//! request. In-flight calls are never cancelled, only ignored.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AnalysisRequest, AnalysisResult, SequenceNumber};
use crate::domain::ports::AnalysisScorer;

/// A finished scorer call, posted back to the engine loop.
#[derive(Debug)]
pub struct ScoreCompletion {
    pub request: AnalysisRequest,
    pub outcome: DomainResult<AnalysisResult>,
}

/// What the engine should do with a completion.
#[derive(Debug)]
pub enum Resolution {
    /// Newest result so far; display it and record it.
    Accepted {
        request: AnalysisRequest,
        result: AnalysisResult,
    },
    /// A newer request was already accepted or everything was superseded.
    Stale { sequence: SequenceNumber },
    /// The latest request failed; show the error.
    Failed {
        sequence: SequenceNumber,
        error: DomainError,
    },
    /// An older request failed; nobody is waiting on it.
    FailureSuppressed { sequence: SequenceNumber },
}

pub struct RequestSequencer {
    scorer: Arc<dyn AnalysisScorer>,
    completion_tx: mpsc::UnboundedSender<ScoreCompletion>,
    latest_sequence: SequenceNumber,
    latest_accepted_sequence: SequenceNumber,
    /// Whether the most recently issued request has completed or been superseded.
    latest_settled: bool,
}

impl RequestSequencer {
    pub fn new(scorer: Arc<dyn AnalysisScorer>, completion_tx: mpsc::UnboundedSender<ScoreCompletion>) -> Self {
        Self {
            scorer,
            completion_tx,
            latest_sequence: 0,
            latest_accepted_sequence: 0,
            latest_settled: true,
        }
    }

    /// Stamp a snapshot with the next sequence number.
    ///
    /// Blank text is never analysed and does not consume a sequence number.
    pub fn issue(&mut self, text: &str, document_version: u64) -> Option<AnalysisRequest> {
        if text.trim().is_empty() {
            return None;
        }
        self.latest_sequence += 1;
        self.latest_settled = false;
        Some(AnalysisRequest::new(self.latest_sequence, text.to_string(), document_version))
    }

    /// Issue a request and start the scorer call in the background.
    ///
    /// The completion is delivered on the completion channel regardless of
    /// outcome. Returns the issued sequence, or `None` for blank text.
    pub fn submit(&mut self, text: &str, document_version: u64) -> Option<SequenceNumber> {
        let request = self.issue(text, document_version)?;
        let sequence = request.sequence;

        tracing::debug!(
            sequence,
            version = document_version,
            scorer = self.scorer.name(),
            chars = request.text_snapshot.len(),
            "submitting analysis request"
        );

        let scorer = Arc::clone(&self.scorer);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let outcome = scorer.score(&request.text_snapshot).await;
            // Receiver gone means the engine shut down; the result has no audience.
            let _ = tx.send(ScoreCompletion { request, outcome });
        });

        Some(sequence)
    }

    /// Decide whether a completion is authoritative.
    pub fn resolve(&mut self, completion: ScoreCompletion) -> Resolution {
        let sequence = completion.request.sequence;
        if sequence == self.latest_sequence {
            self.latest_settled = true;
        }

        match completion.outcome {
            Ok(result) if sequence > self.latest_accepted_sequence => {
                self.latest_accepted_sequence = sequence;
                Resolution::Accepted {
                    request: completion.request,
                    result,
                }
            }
            Ok(_) => Resolution::Stale { sequence },
            Err(error) if sequence == self.latest_sequence && sequence > self.latest_accepted_sequence => {
                Resolution::Failed { sequence, error }
            }
            Err(_) => Resolution::FailureSuppressed { sequence },
        }
    }

    /// Mark every request issued so far as stale.
    ///
    /// Used when the view is replaced by something other than a fresh
    /// verdict (history replay, reset) so late responses cannot overwrite it.
    pub fn supersede(&mut self) {
        self.latest_accepted_sequence = self.latest_sequence;
        self.latest_settled = true;
    }

    pub const fn latest_sequence(&self) -> SequenceNumber {
        self.latest_sequence
    }

    pub const fn latest_accepted_sequence(&self) -> SequenceNumber {
        self.latest_accepted_sequence
    }

    /// Whether the most recently issued request is still outstanding.
    pub const fn is_pending(&self) -> bool {
        !self.latest_settled
    }
}
