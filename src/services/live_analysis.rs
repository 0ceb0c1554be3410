//! Live analysis engine.
//!
//! One tokio task owns the document, the request sequencer, the debounce
//! timer and the history cache. Everything that touches that state arrives
//! as a message: user commands from [`EngineHandle`], debounce fires, scorer
//! completions and URL scan completions. Because only the loop mutates
//! state, there are no locks and no interleaving between "is this stale?"
//! and "display it".
//!
//! Observers read the engine through a `watch` channel of [`AnalysisView`].

use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AnalysisResult, Config, Document, EditSource, HistoryEntry, RewriteStyle, SequenceNumber,
};
use crate::domain::ports::{AnalysisScorer, ExtractedPage, UrlExtractor};

use super::debounce::{DebounceFired, DebounceScheduler, Trigger};
use super::document_state::DocumentState;
use super::history_cache::HistoryCache;
use super::request_sequencer::{RequestSequencer, Resolution, ScoreCompletion};
use super::sample_provider::SampleProvider;

const COMMAND_BUFFER: usize = 64;

/// Runtime knobs for the engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Quiet period after the last edit before analysis fires.
    pub quiet_period: Duration,
    /// Whether edits schedule analysis at all.
    pub auto_analyze: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(1000),
            auto_analyze: true,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet_period: Duration::from_millis(config.debounce.quiet_period_ms),
            auto_analyze: config.debounce.auto_analyze,
        }
    }
}

/// Errors returned through [`EngineHandle`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Analysis engine has stopped")]
    Stopped,

    #[error("A URL scan is already in progress")]
    ScanInProgress,

    #[error("URL must not be empty")]
    EmptyUrl,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// How a caller refers to a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySelector {
    /// 1-based display position, most recent first.
    Index(usize),
    Id(i64),
}

/// Positions are small; ids are epoch milliseconds.
const MAX_HISTORY_POSITION: u64 = 1000;

impl FromStr for HistorySelector {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::ValidationFailed(format!("not a history position or id: {s}")))?;
        if value == 0 {
            return Err(DomainError::ValidationFailed("history positions start at 1".to_string()));
        }
        if value <= MAX_HISTORY_POSITION {
            Ok(Self::Index(value as usize))
        } else {
            i64::try_from(value)
                .map(Self::Id)
                .map_err(|_| DomainError::ValidationFailed(format!("history id out of range: {s}")))
        }
    }
}

/// Snapshot of everything the user should see.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisView {
    pub document: Document,
    /// Last accepted or replayed verdict.
    pub result: Option<AnalysisResult>,
    /// Sequence of the request that produced `result`; `None` for replays.
    pub result_sequence: Option<SequenceNumber>,
    /// History id when `result` was replayed from history.
    pub replayed_from: Option<i64>,
    pub error: Option<String>,
    /// The most recently issued request is still outstanding.
    pub pending: bool,
    pub auto_analyze: bool,
    pub history_len: usize,
}

#[derive(Debug)]
enum EngineCommand {
    Edit {
        text: String,
        source: EditSource,
        reply: oneshot::Sender<u64>,
    },
    Append {
        line: String,
        reply: oneshot::Sender<u64>,
    },
    Analyze {
        reply: oneshot::Sender<Option<SequenceNumber>>,
    },
    LoadHistory {
        selector: HistorySelector,
        reply: oneshot::Sender<DomainResult<HistoryEntry>>,
    },
    History {
        reply: oneshot::Sender<Vec<HistoryEntry>>,
    },
    ClearHistory {
        reply: oneshot::Sender<()>,
    },
    LoadSample {
        reply: oneshot::Sender<Option<String>>,
    },
    Rewrite {
        style: RewriteStyle,
        reply: oneshot::Sender<String>,
    },
    SetAutoAnalyze {
        enabled: bool,
        reply: oneshot::Sender<()>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    ScanUrl {
        url: String,
        reply: oneshot::Sender<Result<ExtractedPage, EngineError>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug)]
struct ScanCompletion {
    url: String,
    outcome: DomainResult<ExtractedPage>,
}

/// Receiving ends of every input the loop selects over.
struct EngineChannels {
    commands: mpsc::Receiver<EngineCommand>,
    fires: mpsc::UnboundedReceiver<DebounceFired>,
    completions: mpsc::UnboundedReceiver<ScoreCompletion>,
    scans: mpsc::UnboundedReceiver<ScanCompletion>,
}

struct EngineState {
    document: DocumentState,
    sequencer: RequestSequencer,
    debounce: DebounceScheduler,
    history: HistoryCache,
    samples: SampleProvider,
    extractor: Arc<dyn UrlExtractor>,
    scan_tx: mpsc::UnboundedSender<ScanCompletion>,
    /// Reply slot of the in-flight scan; occupied means a scan is running.
    scan_reply: Option<oneshot::Sender<Result<ExtractedPage, EngineError>>>,
    auto_analyze: bool,
    result: Option<AnalysisResult>,
    result_sequence: Option<SequenceNumber>,
    replayed_from: Option<i64>,
    error: Option<String>,
    view_tx: watch::Sender<AnalysisView>,
}

pub struct LiveAnalysisEngine;

impl LiveAnalysisEngine {
    /// Start the engine loop and return a handle to it.
    ///
    /// `history` should already be loaded; the engine takes ownership.
    pub fn spawn(
        settings: EngineSettings,
        scorer: Arc<dyn AnalysisScorer>,
        extractor: Arc<dyn UrlExtractor>,
        history: HistoryCache,
    ) -> EngineHandle {
        Self::spawn_with_samples(settings, scorer, extractor, history, SampleProvider::default())
    }

    pub fn spawn_with_samples(
        settings: EngineSettings,
        scorer: Arc<dyn AnalysisScorer>,
        extractor: Arc<dyn UrlExtractor>,
        history: HistoryCache,
        samples: SampleProvider,
    ) -> EngineHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (fire_tx, fire_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (scan_tx, scan_rx) = mpsc::unbounded_channel();

        let initial = AnalysisView {
            auto_analyze: settings.auto_analyze,
            history_len: history.len(),
            ..Default::default()
        };
        let (view_tx, view_rx) = watch::channel(initial);

        let state = EngineState {
            document: DocumentState::new(),
            sequencer: RequestSequencer::new(scorer, completion_tx),
            debounce: DebounceScheduler::new(settings.quiet_period, fire_tx),
            history,
            samples,
            extractor,
            scan_tx,
            scan_reply: None,
            auto_analyze: settings.auto_analyze,
            result: None,
            result_sequence: None,
            replayed_from: None,
            error: None,
            view_tx,
        };
        let channels = EngineChannels {
            commands: command_rx,
            fires: fire_rx,
            completions: completion_rx,
            scans: scan_rx,
        };

        tracing::debug!(
            quiet_period_ms = settings.quiet_period.as_millis() as u64,
            auto_analyze = settings.auto_analyze,
            "starting live analysis engine"
        );
        tokio::spawn(run_loop(state, channels));

        EngineHandle {
            commands: command_tx,
            view: view_rx,
        }
    }
}

async fn run_loop(mut state: EngineState, mut channels: EngineChannels) {
    let mut shutdown_reply = None;

    loop {
        tokio::select! {
            command = channels.commands.recv() => match command {
                Some(EngineCommand::Shutdown { reply }) => {
                    shutdown_reply = Some(reply);
                    break;
                }
                Some(command) => state.handle_command(command).await,
                None => break,
            },
            Some(fired) = channels.fires.recv() => state.on_debounce_fired(fired),
            Some(completion) = channels.completions.recv() => state.on_score_completion(completion).await,
            Some(scan) = channels.scans.recv() => state.on_scan_completion(scan),
        }
        state.publish();
    }

    state.debounce.cancel();
    tracing::debug!("live analysis engine stopped");
    if let Some(reply) = shutdown_reply {
        let _ = reply.send(());
    }
}

impl EngineState {
    async fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Edit { text, source, reply } => {
                let version = self.apply_edit(text, source);
                self.respond(reply, version);
            }
            EngineCommand::Append { line, reply } => {
                let text = match self.document.text() {
                    "" => line,
                    current => format!("{current}\n{line}"),
                };
                let version = self.apply_edit(text, EditSource::Typing);
                self.respond(reply, version);
            }
            EngineCommand::Analyze { reply } => {
                let sequence = self.analyze_now();
                self.respond(reply, sequence);
            }
            EngineCommand::LoadHistory { selector, reply } => {
                let entry = self.load_history(selector);
                self.respond(reply, entry);
            }
            EngineCommand::History { reply } => {
                let _ = reply.send(self.history.entries().to_vec());
            }
            EngineCommand::ClearHistory { reply } => {
                self.history.clear().await;
                tracing::info!("analysis history cleared");
                self.respond(reply, ());
            }
            EngineCommand::LoadSample { reply } => {
                let sample = self.samples.pick(self.document.text()).map(str::to_string);
                if let Some(text) = &sample {
                    self.apply_edit(text.clone(), EditSource::Sample);
                }
                self.respond(reply, sample);
            }
            EngineCommand::Rewrite { style, reply } => {
                let rewritten = style.apply(self.document.text());
                tracing::debug!(style = style.as_str(), "applying quick rewrite");
                self.apply_edit(rewritten.clone(), EditSource::Rewrite);
                self.respond(reply, rewritten);
            }
            EngineCommand::SetAutoAnalyze { enabled, reply } => {
                self.auto_analyze = enabled;
                if !enabled {
                    self.debounce.cancel();
                }
                self.respond(reply, ());
            }
            EngineCommand::Reset { reply } => {
                self.reset();
                self.respond(reply, ());
            }
            EngineCommand::ScanUrl { url, reply } => self.start_scan(url, reply),
            EngineCommand::Shutdown { .. } => {}
        }
    }

    /// Publish the current view, then answer the caller, so a caller that
    /// reads the view right after its call returns sees the effect.
    fn respond<T>(&self, reply: oneshot::Sender<T>, value: T) {
        self.publish();
        let _ = reply.send(value);
    }

    /// The single mutation path for the document.
    fn apply_edit(&mut self, text: String, source: EditSource) -> u64 {
        let version = self.document.set_text(text, source);
        if source.schedules_analysis() {
            if self.auto_analyze {
                self.debounce.schedule(Trigger::debounced(self.document.text()));
            } else {
                self.debounce.cancel();
            }
        }
        version
    }

    fn analyze_now(&mut self) -> Option<SequenceNumber> {
        let text = self.document.text().to_string();
        self.debounce
            .schedule(Trigger::immediate(text))
            .and_then(|text| self.submit(&text))
    }

    fn on_debounce_fired(&mut self, fired: DebounceFired) {
        if let Some(text) = self.debounce.claim(fired) {
            self.submit(&text);
        }
    }

    fn submit(&mut self, text: &str) -> Option<SequenceNumber> {
        let sequence = self.sequencer.submit(text, self.document.current_version());
        match sequence {
            Some(_) => self.error = None,
            None => tracing::trace!("skipping analysis of blank text"),
        }
        sequence
    }

    async fn on_score_completion(&mut self, completion: ScoreCompletion) {
        match self.sequencer.resolve(completion) {
            Resolution::Accepted { request, result } => {
                tracing::info!(
                    sequence = request.sequence,
                    version = request.document_version,
                    label = %result.label,
                    confidence = result.confidence,
                    "analysis accepted"
                );
                self.result = Some(result.clone());
                self.result_sequence = Some(request.sequence);
                self.replayed_from = None;
                self.error = None;
                self.history.record(request.text_snapshot, result).await;
            }
            Resolution::Stale { sequence } => {
                tracing::debug!(sequence, "discarding stale analysis result");
            }
            Resolution::Failed { sequence, error } => {
                tracing::warn!(sequence, error = %error, "analysis failed");
                self.error = Some(error.to_string());
            }
            Resolution::FailureSuppressed { sequence } => {
                tracing::debug!(sequence, "ignoring failure of superseded request");
            }
        }
    }

    fn load_history(&mut self, selector: HistorySelector) -> DomainResult<HistoryEntry> {
        let entry = match selector {
            HistorySelector::Index(position) => self.history.get_index(position),
            HistorySelector::Id(id) => self.history.get(id),
        }
        .cloned()
        .ok_or(match selector {
            HistorySelector::Index(position) => DomainError::HistoryEntryNotFound(position as i64),
            HistorySelector::Id(id) => DomainError::HistoryEntryNotFound(id),
        })?;

        // The replayed verdict must not be overwritten by anything still in flight.
        self.debounce.cancel();
        self.sequencer.supersede();
        self.document.set_text(entry.text.clone(), EditSource::HistoryLoad);
        self.result = Some(entry.result.clone());
        self.result_sequence = None;
        self.replayed_from = Some(entry.id);
        self.error = None;
        tracing::debug!(id = entry.id, "replayed analysis from history");
        Ok(entry)
    }

    fn reset(&mut self) {
        self.debounce.cancel();
        self.sequencer.supersede();
        self.document.set_text(String::new(), EditSource::Reset);
        self.result = None;
        self.result_sequence = None;
        self.replayed_from = None;
        self.error = None;
    }

    fn start_scan(&mut self, url: String, reply: oneshot::Sender<Result<ExtractedPage, EngineError>>) {
        let url = url.trim().to_string();
        if url.is_empty() {
            let _ = reply.send(Err(EngineError::EmptyUrl));
            return;
        }
        if self.scan_reply.is_some() {
            let _ = reply.send(Err(EngineError::ScanInProgress));
            return;
        }

        tracing::debug!(url = %url, "scanning url");
        self.scan_reply = Some(reply);
        let extractor = Arc::clone(&self.extractor);
        let tx = self.scan_tx.clone();
        tokio::spawn(async move {
            let outcome = extractor.extract(&url).await;
            let _ = tx.send(ScanCompletion { url, outcome });
        });
    }

    fn on_scan_completion(&mut self, scan: ScanCompletion) {
        let outcome = match scan.outcome {
            Ok(page) => {
                tracing::info!(url = %scan.url, chars = page.text.len(), "url scanned");
                self.apply_edit(page.text.clone(), EditSource::UrlScan);
                Ok(page)
            }
            Err(e) => {
                tracing::warn!(url = %scan.url, error = %e, "url scan failed");
                Err(EngineError::Domain(e))
            }
        };
        if let Some(reply) = self.scan_reply.take() {
            self.respond(reply, outcome);
        }
    }

    fn view(&self) -> AnalysisView {
        AnalysisView {
            document: self.document.snapshot(),
            result: self.result.clone(),
            result_sequence: self.result_sequence,
            replayed_from: self.replayed_from,
            error: self.error.clone(),
            pending: self.sequencer.is_pending(),
            auto_analyze: self.auto_analyze,
            history_len: self.history.len(),
        }
    }

    fn publish(&self) {
        let view = self.view();
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

/// Cloneable front end to a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<EngineCommand>,
    view: watch::Receiver<AnalysisView>,
}

impl EngineHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> EngineCommand) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(build(tx)).await.map_err(|_| EngineError::Stopped)?;
        rx.await.map_err(|_| EngineError::Stopped)
    }

    /// Replace the document text. Returns the new document version.
    pub async fn edit(&self, text: impl Into<String>, source: EditSource) -> Result<u64, EngineError> {
        let text = text.into();
        self.request(|reply| EngineCommand::Edit { text, source, reply }).await
    }

    /// Add a typed line to the end of the document, as typing does.
    ///
    /// The join happens inside the engine so an update landing between the
    /// caller's last view and this call is not overwritten.
    pub async fn append(&self, line: impl Into<String>) -> Result<u64, EngineError> {
        let line = line.into();
        self.request(|reply| EngineCommand::Append { line, reply }).await
    }

    /// Analyze the current text now, cancelling any pending debounce.
    ///
    /// Returns the issued sequence, or `None` when the text is blank.
    pub async fn analyze(&self) -> Result<Option<SequenceNumber>, EngineError> {
        self.request(|reply| EngineCommand::Analyze { reply }).await
    }

    /// Show a stored entry again without calling the scorer.
    pub async fn load_history(&self, selector: HistorySelector) -> Result<HistoryEntry, EngineError> {
        Ok(self.request(|reply| EngineCommand::LoadHistory { selector, reply }).await??)
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, EngineError> {
        self.request(|reply| EngineCommand::History { reply }).await
    }

    pub async fn clear_history(&self) -> Result<(), EngineError> {
        self.request(|reply| EngineCommand::ClearHistory { reply }).await
    }

    /// Load a random built-in sample. Returns the sample text.
    pub async fn load_sample(&self) -> Result<Option<String>, EngineError> {
        self.request(|reply| EngineCommand::LoadSample { reply }).await
    }

    /// Apply a quick rewrite to the current text. Returns the new text.
    pub async fn rewrite(&self, style: RewriteStyle) -> Result<String, EngineError> {
        self.request(|reply| EngineCommand::Rewrite { style, reply }).await
    }

    pub async fn set_auto_analyze(&self, enabled: bool) -> Result<(), EngineError> {
        self.request(|reply| EngineCommand::SetAutoAnalyze { enabled, reply }).await
    }

    /// Clear text, result and error. History is kept.
    pub async fn reset(&self) -> Result<(), EngineError> {
        self.request(|reply| EngineCommand::Reset { reply }).await
    }

    /// Fetch a page and load its text into the document.
    pub async fn scan_url(&self, url: impl Into<String>) -> Result<ExtractedPage, EngineError> {
        let url = url.into();
        self.request(|reply| EngineCommand::ScanUrl { url, reply }).await?
    }

    /// Latest published view.
    pub fn view(&self) -> AnalysisView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnalysisView> {
        self.view.clone()
    }

    /// Wait until the published view satisfies `predicate`.
    pub async fn wait_until(&self, predicate: impl FnMut(&AnalysisView) -> bool) -> Result<AnalysisView, EngineError> {
        let mut rx = self.view.clone();
        let view = rx.wait_for(predicate).await.map_err(|_| EngineError::Stopped)?;
        Ok(view.clone())
    }

    /// Stop the loop and cancel the debounce timer. In-flight scorer calls
    /// finish in the background and are dropped.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.request(|reply| EngineCommand::Shutdown { reply }).await
    }
}
