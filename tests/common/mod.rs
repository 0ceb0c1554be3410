//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use veritas::adapters::memory::InMemoryKeyValueStore;
use veritas::adapters::mock::{MockAnalysisScorer, MockUrlExtractor};
use veritas::domain::models::HISTORY_CAPACITY;
use veritas::services::{EngineHandle, EngineSettings, HistoryCache, LiveAnalysisEngine};

pub const QUIET: Duration = Duration::from_millis(1000);

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Let spawned tasks and the engine loop run without advancing time.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// An engine wired to mocks, with handles to inspect them.
pub struct TestEngine {
    pub handle: EngineHandle,
    pub scorer: Arc<MockAnalysisScorer>,
    pub extractor: Arc<MockUrlExtractor>,
    pub store: Arc<InMemoryKeyValueStore>,
}

impl TestEngine {
    pub async fn start() -> Self {
        Self::start_with(EngineSettings {
            quiet_period: QUIET,
            auto_analyze: true,
        })
        .await
    }

    pub async fn start_with(settings: EngineSettings) -> Self {
        let scorer = Arc::new(MockAnalysisScorer::new());
        let extractor = Arc::new(MockUrlExtractor::new());
        let store = Arc::new(InMemoryKeyValueStore::new());
        let history = HistoryCache::load(store.clone(), HISTORY_CAPACITY).await;

        let handle = LiveAnalysisEngine::spawn(settings, scorer.clone(), extractor.clone(), history);
        Self {
            handle,
            scorer,
            extractor,
            store,
        }
    }

    /// Replace the text and analyze it immediately; returns the sequence.
    pub async fn analyze_text(&self, text: &str) -> u64 {
        self.handle
            .edit(text, veritas::EditSource::Paste)
            .await
            .expect("engine running");
        self.handle
            .analyze()
            .await
            .expect("engine running")
            .expect("non-blank text is issued")
    }

    /// Wait until the view shows the verdict of `sequence`.
    pub async fn wait_for_sequence(&self, sequence: u64) -> veritas::AnalysisView {
        self.handle
            .wait_until(|v| v.result_sequence == Some(sequence))
            .await
            .expect("engine running")
    }
}
