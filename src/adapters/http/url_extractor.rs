//! HTTP URL extraction adapter.
//!
//! Posts `{"url": ...}` to `{base_url}/scan-url`. Failures carry the
//! service's `detail` message when it sends one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ExtractorConfig;
use crate::domain::ports::{ExtractedPage, UrlExtractor};

#[derive(Serialize)]
struct ScanRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct HttpUrlExtractor {
    client: reqwest::Client,
    scan_url: String,
}

impl HttpUrlExtractor {
    pub fn new(config: &ExtractorConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            scan_url: format!("{}/scan-url", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl UrlExtractor for HttpUrlExtractor {
    async fn extract(&self, url: &str) -> DomainResult<ExtractedPage> {
        let response = self
            .client
            .post(&self.scan_url)
            .json(&ScanRequest { url })
            .send()
            .await
            .map_err(|e| DomainError::ExtractionFailed(format!("Failed to scan URL: {e}")))?;

        if !response.status().is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| "Failed to scan URL".to_string());
            return Err(DomainError::ExtractionFailed(detail));
        }

        response
            .json::<ExtractedPage>()
            .await
            .map_err(|e| DomainError::ExtractionFailed(format!("Unreadable scan response: {e}")))
    }
}
