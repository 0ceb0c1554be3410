//! History persistence across engine restarts, backed by a real SQLite file.

mod common;

use std::sync::Arc;
use tokio_test::assert_ok;

use veritas::adapters::mock::{MockAnalysisScorer, MockUrlExtractor};
use veritas::domain::models::{Config, HistoryConfig, Label, HISTORY_CAPACITY};
use veritas::infrastructure::setup::{bootstrap, open_history_store};
use veritas::services::{EngineSettings, HistoryCache, HistorySelector, LiveAnalysisEngine};
use veritas::EditSource;

fn history_config(dir: &tempfile::TempDir) -> HistoryConfig {
    HistoryConfig {
        database_path: dir.path().join("veritas.db").display().to_string(),
        capacity: HISTORY_CAPACITY,
    }
}

fn manual_settings() -> EngineSettings {
    EngineSettings {
        quiet_period: common::QUIET,
        auto_analyze: false,
    }
}

#[tokio::test]
async fn test_history_survives_restart_and_keeps_newest_ten() {
    common::setup_test_logging();
    let dir = common::temp_dir();
    let config = history_config(&dir);

    {
        let store = open_history_store(&config).await;
        let history = HistoryCache::load(store, config.capacity).await;
        assert!(history.is_empty());

        let handle = LiveAnalysisEngine::spawn(
            manual_settings(),
            Arc::new(MockAnalysisScorer::new()),
            Arc::new(MockUrlExtractor::new()),
            history,
        );

        for i in 1..=11 {
            assert_ok!(handle.edit(format!("Headline number {i}"), EditSource::Paste).await);
            let sequence = handle.analyze().await.unwrap().unwrap();
            handle
                .wait_until(|v| v.result_sequence == Some(sequence))
                .await
                .unwrap();
        }
        assert_eq!(handle.view().history_len, 10);
        assert_ok!(handle.shutdown().await);
    }

    let store = open_history_store(&config).await;
    let reloaded = HistoryCache::load(store, config.capacity).await;

    assert_eq!(reloaded.len(), 10);
    assert_eq!(reloaded.entries()[0].text, "Headline number 11");
    assert_eq!(reloaded.entries()[9].text, "Headline number 2");
    assert!(
        reloaded.entries().windows(2).all(|w| w[0].id > w[1].id),
        "entries are newest first with unique ids"
    );
}

#[tokio::test]
async fn test_reloaded_entry_replays_without_scoring() {
    let dir = common::temp_dir();
    let config = history_config(&dir);

    {
        let store = open_history_store(&config).await;
        let handle = LiveAnalysisEngine::spawn(
            manual_settings(),
            Arc::new(MockAnalysisScorer::new()),
            Arc::new(MockUrlExtractor::new()),
            HistoryCache::load(store, config.capacity).await,
        );
        handle.edit("Shocking cure found!", EditSource::Paste).await.unwrap();
        let sequence = handle.analyze().await.unwrap().unwrap();
        handle
            .wait_until(|v| v.result_sequence == Some(sequence))
            .await
            .unwrap();
        handle.shutdown().await.unwrap();
    }

    let scorer = Arc::new(MockAnalysisScorer::new());
    let store = open_history_store(&config).await;
    let handle = LiveAnalysisEngine::spawn(
        manual_settings(),
        scorer.clone(),
        Arc::new(MockUrlExtractor::new()),
        HistoryCache::load(store, config.capacity).await,
    );

    let entry = handle.load_history(HistorySelector::Index(1)).await.unwrap();
    assert_eq!(entry.text, "Shocking cure found!");

    let view = handle.view();
    assert_eq!(view.document.text, "Shocking cure found!");
    assert_eq!(view.result.map(|r| r.label), Some(Label::Fake));
    assert_eq!(view.replayed_from, Some(entry.id));
    assert_eq!(scorer.call_count().await, 0);
}

#[tokio::test]
async fn test_clear_history_persists() {
    let dir = common::temp_dir();
    let config = history_config(&dir);

    {
        let store = open_history_store(&config).await;
        let handle = LiveAnalysisEngine::spawn(
            manual_settings(),
            Arc::new(MockAnalysisScorer::new()),
            Arc::new(MockUrlExtractor::new()),
            HistoryCache::load(store, config.capacity).await,
        );
        handle.edit("Council meets Tuesday", EditSource::Paste).await.unwrap();
        let sequence = handle.analyze().await.unwrap().unwrap();
        handle
            .wait_until(|v| v.result_sequence == Some(sequence))
            .await
            .unwrap();
        handle.clear_history().await.unwrap();
        assert_eq!(handle.view().history_len, 0);
        handle.shutdown().await.unwrap();
    }

    let store = open_history_store(&config).await;
    assert!(HistoryCache::load(store, config.capacity).await.is_empty());
}

#[tokio::test]
async fn test_bootstrapped_engine_scores_over_http_and_records() {
    let dir = common::temp_dir();
    let mut server = mockito::Server::new_async().await;
    let predict = server
        .mock("POST", "/predict")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"label":"FAKE","confidence":91.2,"status":"success"}"#)
        .create_async()
        .await;

    let mut config = Config::default();
    config.scorer.base_url = server.url();
    config.extractor.base_url = server.url();
    config.debounce.auto_analyze = false;
    config.history = history_config(&dir);

    let handle = bootstrap(&config).await.unwrap();
    handle.edit("Aliens endorse candidate", EditSource::Paste).await.unwrap();
    let sequence = handle.analyze().await.unwrap().unwrap();
    let view = handle
        .wait_until(|v| v.result_sequence == Some(sequence))
        .await
        .unwrap();

    predict.assert_async().await;
    let result = view.result.unwrap();
    assert_eq!(result.label, Label::Fake);
    assert!((result.confidence - 91.2).abs() < f64::EPSILON);
    assert_eq!(view.history_len, 1);
    handle.shutdown().await.unwrap();

    let store = open_history_store(&config.history).await;
    let reloaded = HistoryCache::load(store, config.history.capacity).await;
    assert_eq!(reloaded.entries()[0].text, "Aliens endorse candidate");
}

#[tokio::test]
async fn test_bootstrapped_engine_surfaces_scoring_failure() {
    let dir = common::temp_dir();
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/predict")
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let mut config = Config::default();
    config.scorer.base_url = server.url();
    config.debounce.auto_analyze = false;
    config.history = history_config(&dir);

    let handle = bootstrap(&config).await.unwrap();
    handle.edit("Some text", EditSource::Paste).await.unwrap();
    handle.analyze().await.unwrap();
    let view = handle.wait_until(|v| v.error.is_some()).await.unwrap();

    assert!(view.result.is_none());
    assert!(!view.pending);
    assert_eq!(view.history_len, 0);
}
