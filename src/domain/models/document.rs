use serde::{Deserialize, Serialize};
use std::fmt;

/// The text the user currently sees, with its mutation counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    /// Bumped on every mutation, never reused.
    pub version: u64,
}

impl Document {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Where a document mutation came from.
///
/// Every source goes through the same mutation path; the source is only
/// recorded for logging and for deciding whether the edit arms the debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditSource {
    /// Interactive typing.
    Typing,
    Paste,
    Drop,
    /// A built-in sample was loaded.
    Sample,
    /// A quick rewrite was applied to the current text.
    Rewrite,
    /// Text fetched from a URL.
    UrlScan,
    /// A history entry was loaded for re-display.
    HistoryLoad,
    Reset,
}

impl EditSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Paste => "paste",
            Self::Drop => "drop",
            Self::Sample => "sample",
            Self::Rewrite => "rewrite",
            Self::UrlScan => "url_scan",
            Self::HistoryLoad => "history_load",
            Self::Reset => "reset",
        }
    }

    /// Whether an edit from this source should arm the debounced analysis.
    ///
    /// History loads replay a stored result and resets clear the view, so
    /// neither schedules a new request.
    pub const fn schedules_analysis(&self) -> bool {
        !matches!(self, Self::HistoryLoad | Self::Reset)
    }
}

impl fmt::Display for EditSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
