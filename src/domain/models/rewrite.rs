//! Quick rewrite transforms applied to the current text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::domain::errors::DomainError;

static EXCLAMATION_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!+").expect("static pattern"));
static SENSATIONAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(BREAKING|SHOCKING):").expect("static pattern"));
static WONT_BELIEVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)You won't believe").expect("static pattern"));
static DESTROYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)destroys").expect("static pattern"));
static WANNA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bwanna\b").expect("static pattern"));
static GONNA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bgonna\b").expect("static pattern"));

/// Rewrite style offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteStyle {
    /// Tone down sensational punctuation and prefixes.
    Neutral,
    /// Replace common clickbait phrasing.
    DeClickbait,
    /// Expand informal contractions.
    Formal,
}

impl RewriteStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::DeClickbait => "declickbait",
            Self::Formal => "formal",
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Neutral => {
                let text = EXCLAMATION_RUN.replace_all(text, ".");
                SENSATIONAL_PREFIX.replace_all(&text, "").into_owned()
            }
            Self::DeClickbait => {
                let text = WONT_BELIEVE.replace_all(text, "It is surprising");
                DESTROYS.replace_all(&text, "criticizes").into_owned()
            }
            Self::Formal => {
                let text = WANNA.replace_all(text, "want to");
                GONNA.replace_all(&text, "going to").into_owned()
            }
        }
    }
}

impl FromStr for RewriteStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Self::Neutral),
            "declickbait" | "de-clickbait" | "less-clickbait" => Ok(Self::DeClickbait),
            "formal" => Ok(Self::Formal),
            other => Err(DomainError::ValidationFailed(format!(
                "Unknown rewrite style: {other}. Expected one of: neutral, declickbait, formal"
            ))),
        }
    }
}
