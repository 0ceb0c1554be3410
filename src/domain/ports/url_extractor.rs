//! URL-to-text extraction port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;

/// Text extracted from a web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[async_trait]
pub trait UrlExtractor: Send + Sync {
    /// Fetch `url` and return its readable text. Errors carry a
    /// human-readable detail suitable for showing to the user.
    async fn extract(&self, url: &str) -> DomainResult<ExtractedPage>;
}
