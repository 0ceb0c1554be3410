//! Verdict color mapping for CLI output.
//!
//! `console` disables styling automatically when output is not a terminal
//! or `NO_COLOR` is set.

use console::{style, StyledObject};

use crate::domain::models::Label;

/// Red for fabricated, green for genuine.
pub fn colorize_label(label: Label) -> StyledObject<&'static str> {
    match label {
        Label::Fake => style(label.as_str()).red().bold(),
        Label::Real => style(label.as_str()).green().bold(),
    }
}

/// Confidence as a percentage, dimmed when the model is unsure.
pub fn colorize_confidence(confidence: f64) -> StyledObject<String> {
    let text = format!("{confidence:.1}%");
    if confidence < 60.0 {
        style(text).dim()
    } else {
        style(text).bold()
    }
}

/// Field label used in detail views.
pub fn label(key: &str) -> StyledObject<String> {
    style(format!("{key}:")).dim()
}
