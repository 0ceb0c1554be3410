//! Mock scorer and URL extractor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AnalysisResult, Label};
use crate::domain::ports::{AnalysisScorer, ExtractedPage, UrlExtractor};

/// Scripted behaviour for one input text.
#[derive(Debug, Clone)]
pub struct MockScore {
    /// Verdict to return, or the failure message.
    pub outcome: Result<AnalysisResult, String>,
    /// Simulated latency.
    pub delay: Option<Duration>,
}

impl MockScore {
    pub fn success(result: AnalysisResult) -> Self {
        Self {
            outcome: Ok(result),
            delay: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: None,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Mock scorer for testing.
///
/// Texts without a scripted response get a deterministic verdict: `FAKE`
/// when the text contains `!`, otherwise `REAL`. A text can also be gated,
/// in which case its call blocks until the gate is released.
#[derive(Default)]
pub struct MockAnalysisScorer {
    scripted: RwLock<HashMap<String, MockScore>>,
    gates: RwLock<HashMap<String, Arc<Notify>>>,
    calls: RwLock<Vec<String>>,
}

impl MockAnalysisScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn script(&self, text: &str, score: MockScore) {
        self.scripted.write().await.insert(text.to_string(), score);
    }

    /// Hold every call for `text` until the returned gate is notified.
    pub async fn gate(&self, text: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.write().await.insert(text.to_string(), Arc::clone(&notify));
        notify
    }

    /// Texts scored so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    pub fn default_verdict(text: &str) -> AnalysisResult {
        if text.contains('!') {
            AnalysisResult::new(Label::Fake, 82.0)
        } else {
            AnalysisResult::new(Label::Real, 74.5)
        }
    }
}

#[async_trait]
impl AnalysisScorer for MockAnalysisScorer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn score(&self, text: &str) -> DomainResult<AnalysisResult> {
        self.calls.write().await.push(text.to_string());

        let gate = self.gates.read().await.get(text).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self.scripted.read().await.get(text).cloned();
        match scripted {
            Some(score) => {
                if let Some(delay) = score.delay {
                    tokio::time::sleep(delay).await;
                }
                score.outcome.map_err(DomainError::ScoringFailed)
            }
            None => Ok(Self::default_verdict(text)),
        }
    }
}

/// Mock URL extractor keyed by URL.
#[derive(Default)]
pub struct MockUrlExtractor {
    pages: RwLock<HashMap<String, Result<ExtractedPage, String>>>,
    gate: RwLock<Option<Arc<Notify>>>,
}

impl MockUrlExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn page(&self, url: &str, text: &str) {
        self.pages.write().await.insert(
            url.to_string(),
            Ok(ExtractedPage {
                text: text.to_string(),
                title: None,
            }),
        );
    }

    pub async fn fail(&self, url: &str, detail: &str) {
        self.pages.write().await.insert(url.to_string(), Err(detail.to_string()));
    }

    /// Hold every extraction until the returned gate is notified.
    pub async fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.write().await = Some(Arc::clone(&notify));
        notify
    }
}

#[async_trait]
impl UrlExtractor for MockUrlExtractor {
    async fn extract(&self, url: &str) -> DomainResult<ExtractedPage> {
        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.pages.read().await.get(url).cloned() {
            Some(Ok(page)) => Ok(page),
            Some(Err(detail)) => Err(DomainError::ExtractionFailed(detail)),
            None => Err(DomainError::ExtractionFailed(format!("Failed to fetch URL: {url}"))),
        }
    }
}
