use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;

/// Default number of entries kept in the history cache.
pub const HISTORY_CAPACITY: usize = 10;

/// Key under which the serialized history is stored.
pub const HISTORY_STORAGE_KEY: &str = "analysis_history";

/// One accepted analysis, as recorded in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in epoch milliseconds; doubles as the unique key.
    pub id: i64,
    pub text: String,
    pub result: AnalysisResult,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(id: i64, text: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            id,
            text: text.into(),
            result,
            timestamp: id,
        }
    }

    /// First line of the text, cut to `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.text.lines().next().unwrap_or_default().trim();
        if first_line.chars().count() <= max_chars {
            first_line.to_string()
        } else {
            let cut: String = first_line.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }
}
