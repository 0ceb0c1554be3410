use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict label produced by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Real,
    Fake,
}

impl Label {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword the scorer flagged, with the category it was flagged under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedKeyword {
    pub word: String,
    pub category: String,
}

/// Linguistic sub-metrics attached to a verdict.
///
/// Kept as the raw JSON the scorer sent, so a result survives a trip through
/// history unchanged whatever shape the sub-metrics take. The accessors are
/// for display only and return `None` when a field is missing or has an
/// unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisDetails(serde_json::Value);

impl AnalysisDetails {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(serde_json::Value::as_f64)
    }

    pub fn sentiment(&self) -> Option<&str> {
        self.text("sentiment")
    }

    pub fn objectivity(&self) -> Option<&str> {
        self.text("objectivity")
    }

    pub fn tone(&self) -> Option<&str> {
        self.text("tone")
    }

    pub fn topic(&self) -> Option<&str> {
        self.text("topic")
    }

    pub fn reading_level(&self) -> Option<&str> {
        self.text("reading_level")
    }

    /// Flesch reading-ease score.
    pub fn reading_score(&self) -> Option<f64> {
        self.number("reading_score")
    }

    /// Clickbait index, 0-100.
    pub fn clickbait_score(&self) -> Option<f64> {
        self.number("clickbait_score")
    }

    /// Flagged keywords that have the expected shape; others are skipped.
    pub fn flagged_keywords(&self) -> Vec<FlaggedKeyword> {
        self.0
            .get("flagged_keywords")
            .and_then(serde_json::Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Verdict returned by the scoring service for one text.
///
/// The engine never interprets these fields; it only transports them from
/// the scorer to the view and into history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: Label,

    /// Confidence in percent (0-100).
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "AnalysisDetails::is_empty")]
    pub analysis: AnalysisDetails,
}

impl AnalysisResult {
    pub fn new(label: Label, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            status: None,
            analysis: AnalysisDetails::default(),
        }
    }

    pub fn with_analysis(mut self, analysis: AnalysisDetails) -> Self {
        self.analysis = analysis;
        self
    }
}
