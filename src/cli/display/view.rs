//! Rendering of verdicts and the live analysis view.

use console::style;

use super::colors::{colorize_confidence, colorize_label};
use super::detail::DetailView;
use crate::cli::output::truncate;
use crate::domain::models::AnalysisResult;
use crate::services::AnalysisView;

/// Detail view of one verdict.
pub fn render_result(result: &AnalysisResult) -> String {
    let details = &result.analysis;
    let reading = details.reading_score().map(|score| match details.reading_level() {
        Some(level) => format!("{score:.1} ({level})"),
        None => format!("{score:.1}"),
    });
    let clickbait = details.clickbait_score().map(|score| format!("{score:.0}/100"));

    let mut view = DetailView::new(&format!(
        "{} {}",
        colorize_label(result.label),
        colorize_confidence(result.confidence)
    ))
    .field_opt("Topic", details.topic())
    .field_opt("Sentiment", details.sentiment())
    .field_opt("Objectivity", details.objectivity())
    .field_opt("Tone", details.tone())
    .field_opt("Reading", reading.as_deref())
    .field_opt("Clickbait", clickbait.as_deref())
    .section("Flagged keywords");

    for keyword in details.flagged_keywords() {
        view = view.item(&format!("{} ({})", keyword.word, keyword.category));
    }
    view.render()
}

/// Status block shown in the live session after every change.
pub fn render_view(view: &AnalysisView) -> String {
    let mut lines = Vec::new();

    let text = if view.document.is_blank() {
        style("(empty)".to_string()).dim().to_string()
    } else {
        truncate(view.document.text.lines().next().unwrap_or_default(), 72)
    };
    lines.push(format!("{} {text}", style(format!("v{}", view.document.version)).dim()));

    if let Some(error) = &view.error {
        lines.push(format!("{} {error}", style("error:").red().bold()));
    }

    match &view.result {
        Some(result) => {
            let origin = match (view.replayed_from, view.result_sequence) {
                (Some(id), _) => format!(" (from history #{id})"),
                (None, Some(sequence)) => format!(" (request {sequence})"),
                (None, None) => String::new(),
            };
            lines.push(format!("{}{}", render_result(result), style(origin).dim()));
        }
        None if !view.pending => lines.push(style("No verdict yet".to_string()).dim().to_string()),
        None => {}
    }

    if view.pending {
        lines.push(style("analyzing...".to_string()).yellow().to_string());
    }
    if !view.auto_analyze {
        lines.push(style("auto-analyze off; :analyze to run".to_string()).dim().to_string());
    }
    lines.join("\n")
}
