//! The single authoritative document.

use crate::domain::models::{Document, EditSource};

/// Owns the current text and its version counter.
///
/// Every mutation, whatever its source, goes through [`set_text`](Self::set_text)
/// and bumps the version.
#[derive(Debug, Default)]
pub struct DocumentState {
    document: Document,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text and return the new version.
    pub fn set_text(&mut self, text: impl Into<String>, source: EditSource) -> u64 {
        self.document.text = text.into();
        self.document.version += 1;
        tracing::trace!(
            version = self.document.version,
            source = %source,
            chars = self.document.text.len(),
            "document updated"
        );
        self.document.version
    }

    pub fn text(&self) -> &str {
        &self.document.text
    }

    pub const fn current_version(&self) -> u64 {
        self.document.version
    }

    pub fn snapshot(&self) -> Document {
        self.document.clone()
    }
}
