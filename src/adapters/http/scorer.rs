//! HTTP scoring service adapter.
//!
//! Posts `{"text": ...}` to `{base_url}/predict` and parses the verdict JSON.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AnalysisResult, ScorerConfig};
use crate::domain::ports::AnalysisScorer;

#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

/// Scoring client backed by a pooled reqwest client.
pub struct HttpAnalysisScorer {
    client: reqwest::Client,
    predict_url: String,
    timeout_secs: u64,
}

impl HttpAnalysisScorer {
    pub fn new(config: &ScorerConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            predict_url: format!("{}/predict", config.base_url.trim_end_matches('/')),
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_send_error(&self, err: &reqwest::Error) -> DomainError {
        if err.is_timeout() {
            DomainError::ScoringFailed(format!("request timed out after {}s", self.timeout_secs))
        } else {
            DomainError::ScoringFailed(format!("request failed: {err}"))
        }
    }
}

#[async_trait]
impl AnalysisScorer for HttpAnalysisScorer {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn score(&self, text: &str) -> DomainResult<AnalysisResult> {
        let response = self
            .client
            .post(&self.predict_url)
            .json(&PredictRequest { text })
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            tracing::debug!(%status, body = %body, "scoring service returned error status");
            return Err(DomainError::ScoringFailed(format!(
                "scoring service returned {status}"
            )));
        }

        response
            .json::<AnalysisResult>()
            .await
            .map_err(|e| DomainError::ScoringFailed(format!("failed to parse verdict: {e}")))
    }
}
