pub mod debounce;
pub mod document_state;
pub mod history_cache;
pub mod live_analysis;
pub mod request_sequencer;
pub mod sample_provider;
pub mod timer;

pub use debounce::{DebounceFired, DebounceScheduler, Trigger};
pub use document_state::DocumentState;
pub use history_cache::HistoryCache;
pub use live_analysis::{
    AnalysisView, EngineError, EngineHandle, EngineSettings, HistorySelector, LiveAnalysisEngine,
};
pub use request_sequencer::{RequestSequencer, Resolution, ScoreCompletion};
pub use sample_provider::SampleProvider;
pub use timer::CancellableTimer;
