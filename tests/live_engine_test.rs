//! End-to-end behaviour of the live analysis engine against mock services.

mod common;

use std::time::Duration;

use common::{settle, TestEngine, QUIET};
use veritas::adapters::mock::MockScore;
use veritas::domain::models::{AnalysisResult, EditSource, Label};
use veritas::services::sample_provider::BUILTIN_SAMPLES;
use veritas::services::{EngineError, EngineSettings, HistorySelector};
use veritas::DomainError;

#[tokio::test(start_paused = true)]
async fn test_slow_older_response_never_overwrites_newer() {
    let engine = TestEngine::start().await;
    let release_a = engine.scorer.gate("A").await;

    let seq_a = engine.analyze_text("A").await;
    let seq_b = engine.analyze_text("B").await;
    assert_eq!((seq_a, seq_b), (1, 2));

    let view = engine.wait_for_sequence(seq_b).await;
    assert_eq!(view.document.text, "B");

    release_a.notify_one();
    settle().await;

    let view = engine.handle.view();
    assert_eq!(view.result_sequence, Some(2), "stale result must be discarded");
    assert!(!view.pending);
    assert_eq!(engine.scorer.calls().await, vec!["A".to_string(), "B".to_string()]);

    let history = engine.handle.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "B");
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_submit_once_for_final_text() {
    let engine = TestEngine::start().await;

    for text in ["T", "Th", "The", "The news"] {
        engine.handle.edit(text, EditSource::Typing).await.unwrap();
        tokio::time::advance(Duration::from_millis(300)).await;
        settle().await;
    }
    assert_eq!(engine.scorer.call_count().await, 0, "nothing fires inside the quiet period");

    tokio::time::advance(QUIET).await;
    let view = engine.handle.wait_until(|v| v.result.is_some()).await.unwrap();

    assert_eq!(view.result_sequence, Some(1));
    assert_eq!(engine.scorer.calls().await, vec!["The news".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_immediate_analyze_cancels_pending_debounce() {
    let engine = TestEngine::start().await;

    engine.handle.edit("draft", EditSource::Typing).await.unwrap();
    let sequence = engine.handle.analyze().await.unwrap();
    assert_eq!(sequence, Some(1));

    tokio::time::advance(QUIET * 3).await;
    settle().await;

    assert_eq!(engine.scorer.calls().await, vec!["draft".to_string()]);
    assert_eq!(engine.handle.view().result_sequence, Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_history_replay_makes_no_scorer_call() {
    let engine = TestEngine::start().await;
    let alpha = engine.analyze_text("Alpha report").await;
    engine.wait_for_sequence(alpha).await;
    let beta = engine.analyze_text("Beta report!").await;
    engine.wait_for_sequence(beta).await;

    let before = engine.handle.view().document.version;
    let entry = engine.handle.load_history(HistorySelector::Index(2)).await.unwrap();
    assert_eq!(entry.text, "Alpha report");

    tokio::time::advance(QUIET * 2).await;
    settle().await;

    let view = engine.handle.view();
    assert_eq!(view.document.text, "Alpha report");
    assert_eq!(view.document.version, before + 1);
    assert_eq!(view.replayed_from, Some(entry.id));
    assert_eq!(view.result.as_ref().map(|r| r.label), Some(Label::Real));
    assert_eq!(view.result_sequence, None);
    assert_eq!(engine.scorer.call_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_history_replay_supersedes_in_flight_request() {
    let engine = TestEngine::start().await;
    let first = engine.analyze_text("Earlier story").await;
    engine.wait_for_sequence(first).await;

    let release = engine.scorer.gate("Slow story").await;
    engine.analyze_text("Slow story").await;
    assert!(engine.handle.view().pending);

    engine.handle.load_history(HistorySelector::Index(1)).await.unwrap();
    release.notify_one();
    settle().await;

    let view = engine.handle.view();
    assert_eq!(view.document.text, "Earlier story");
    assert!(view.replayed_from.is_some(), "late verdict must not replace the replay");
    assert!(!view.pending);
    assert_eq!(engine.handle.history().await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_history_entry() {
    let engine = TestEngine::start().await;
    let err = engine.handle.load_history(HistorySelector::Id(42)).await.unwrap_err();
    assert!(matches!(err, EngineError::Domain(DomainError::HistoryEntryNotFound(42))));
}

#[tokio::test(start_paused = true)]
async fn test_failure_of_latest_request_is_surfaced() {
    let engine = TestEngine::start().await;
    engine
        .scorer
        .script("Broken", MockScore::failure("scoring service returned 500 Internal Server Error"))
        .await;

    engine.analyze_text("Broken").await;
    let view = engine.handle.wait_until(|v| v.error.is_some()).await.unwrap();

    assert!(view.error.unwrap().contains("500"));
    assert!(!view.pending);
    assert!(view.result.is_none());
    assert!(engine.handle.history().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failure_of_superseded_request_is_hidden() {
    let engine = TestEngine::start().await;
    engine
        .scorer
        .script("Old", MockScore::failure("timed out").after(Duration::from_millis(500)))
        .await;

    engine.analyze_text("Old").await;
    let newer = engine.analyze_text("New").await;
    engine.wait_for_sequence(newer).await;

    tokio::time::advance(Duration::from_millis(500)).await;
    settle().await;

    let view = engine.handle.view();
    assert_eq!(view.error, None);
    assert_eq!(view.result_sequence, Some(newer));
}

#[tokio::test(start_paused = true)]
async fn test_new_submit_clears_previous_error() {
    let engine = TestEngine::start().await;
    engine.scorer.script("Bad", MockScore::failure("boom")).await;

    engine.analyze_text("Bad").await;
    engine.handle.wait_until(|v| v.error.is_some()).await.unwrap();

    let good = engine.analyze_text("Good").await;
    assert_eq!(engine.handle.view().error, None);
    engine.wait_for_sequence(good).await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_view_but_keeps_history() {
    let engine = TestEngine::start().await;
    let sequence = engine.analyze_text("Keep me in history").await;
    engine.wait_for_sequence(sequence).await;

    engine.handle.reset().await.unwrap();
    let view = engine.handle.view();
    assert_eq!(view.document.text, "");
    assert!(view.result.is_none());
    assert!(view.error.is_none());
    assert_eq!(view.history_len, 1);

    tokio::time::advance(QUIET * 2).await;
    settle().await;
    assert_eq!(engine.scorer.call_count().await, 1, "reset does not schedule analysis");
}

#[tokio::test(start_paused = true)]
async fn test_blank_text_is_never_submitted() {
    let engine = TestEngine::start().await;
    engine.handle.edit("   \n  ", EditSource::Typing).await.unwrap();
    tokio::time::advance(QUIET * 2).await;
    settle().await;

    assert_eq!(engine.handle.analyze().await.unwrap(), None);
    assert_eq!(engine.scorer.call_count().await, 0);
    assert!(!engine.handle.view().pending);
}

#[tokio::test(start_paused = true)]
async fn test_auto_analyze_off_only_runs_on_demand() {
    let engine = TestEngine::start_with(EngineSettings {
        quiet_period: QUIET,
        auto_analyze: false,
    })
    .await;

    engine.handle.edit("Manual only", EditSource::Typing).await.unwrap();
    tokio::time::advance(QUIET * 5).await;
    settle().await;
    assert_eq!(engine.scorer.call_count().await, 0);

    engine.handle.analyze().await.unwrap();
    engine.handle.wait_until(|v| v.result.is_some()).await.unwrap();
    assert_eq!(engine.scorer.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_turning_auto_off_cancels_pending_timer() {
    let engine = TestEngine::start().await;
    engine.handle.edit("Pending", EditSource::Typing).await.unwrap();
    engine.handle.set_auto_analyze(false).await.unwrap();

    tokio::time::advance(QUIET * 2).await;
    settle().await;
    assert_eq!(engine.scorer.call_count().await, 0);
    assert!(!engine.handle.view().auto_analyze);
}

#[tokio::test(start_paused = true)]
async fn test_sample_load_is_debounced_like_typing() {
    let engine = TestEngine::start().await;

    let first = engine.handle.load_sample().await.unwrap().unwrap();
    assert!(BUILTIN_SAMPLES.contains(&first.as_str()));
    let second = engine.handle.load_sample().await.unwrap().unwrap();
    assert_ne!(first, second);
    assert_eq!(engine.handle.view().document.text, second);

    tokio::time::advance(QUIET).await;
    engine.handle.wait_until(|v| v.result.is_some()).await.unwrap();
    assert_eq!(engine.scorer.calls().await, vec![second]);
}

#[tokio::test(start_paused = true)]
async fn test_url_scan_loads_text_and_schedules_analysis() {
    let engine = TestEngine::start().await;
    engine
        .extractor
        .page("https://news.example/story", "City opens new library branch")
        .await;

    let page = engine.handle.scan_url("https://news.example/story").await.unwrap();
    assert_eq!(page.text, "City opens new library branch");
    assert_eq!(engine.handle.view().document.text, page.text);

    tokio::time::advance(QUIET).await;
    engine.handle.wait_until(|v| v.result.is_some()).await.unwrap();
    assert_eq!(engine.scorer.calls().await, vec![page.text]);
}

#[tokio::test(start_paused = true)]
async fn test_url_scan_failures_are_returned() {
    let engine = TestEngine::start().await;
    engine
        .extractor
        .fail("https://news.example/missing", "Failed to fetch URL: 404")
        .await;

    let err = engine.handle.scan_url("https://news.example/missing").await.unwrap_err();
    match err {
        EngineError::Domain(DomainError::ExtractionFailed(detail)) => assert!(detail.contains("404")),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(engine.handle.scan_url("   ").await, Err(EngineError::EmptyUrl)));
    assert_eq!(engine.handle.view().document.version, 0, "failed scans leave the text alone");
}

#[tokio::test(start_paused = true)]
async fn test_url_scan_is_single_flight() {
    let engine = TestEngine::start().await;
    engine.extractor.page("https://news.example/a", "Story A").await;
    let release = engine.extractor.gate().await;

    let first = {
        let handle = engine.handle.clone();
        tokio::spawn(async move { handle.scan_url("https://news.example/a").await })
    };
    settle().await;

    let second = engine.handle.scan_url("https://news.example/a").await;
    assert!(matches!(second, Err(EngineError::ScanInProgress)));

    release.notify_one();
    let page = first.await.unwrap().unwrap();
    assert_eq!(page.text, "Story A");
}

#[tokio::test(start_paused = true)]
async fn test_append_builds_on_text_loaded_by_scan() {
    let engine = TestEngine::start().await;
    engine.extractor.page("https://news.example/a", "Story A").await;
    let release = engine.extractor.gate().await;

    let scan = {
        let handle = engine.handle.clone();
        tokio::spawn(async move { handle.scan_url("https://news.example/a").await })
    };
    settle().await;
    let stale = engine.handle.view();
    assert_eq!(stale.document.text, "");

    release.notify_one();
    scan.await.unwrap().unwrap();
    engine.handle.append("Follow-up line").await.unwrap();

    assert_eq!(engine.handle.view().document.text, "Story A\nFollow-up line");
}

#[tokio::test(start_paused = true)]
async fn test_history_write_failure_is_not_surfaced() {
    let engine = TestEngine::start().await;
    engine.store.set_fail_writes(true);

    let sequence = engine.analyze_text("Offline save").await;
    let view = engine.wait_for_sequence(sequence).await;

    assert_eq!(view.error, None);
    assert_eq!(view.history_len, 1, "in-memory history still updates");
}

#[tokio::test(start_paused = true)]
async fn test_accepted_results_are_recorded_in_acceptance_order() {
    let engine = TestEngine::start().await;
    engine
        .scorer
        .script(
            "first",
            MockScore::success(AnalysisResult::new(Label::Fake, 90.0)).after(Duration::from_millis(200)),
        )
        .await;

    let first = engine.analyze_text("first").await;
    engine.handle.edit("second", EditSource::Typing).await.unwrap();
    // Accepted first because nothing newer has completed yet.
    engine.wait_for_sequence(first).await;

    let second = engine.handle.analyze().await.unwrap().unwrap();
    engine.wait_for_sequence(second).await;

    let texts: Vec<_> = engine
        .handle
        .history()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(texts, vec!["second".to_string(), "first".to_string()]);
}
