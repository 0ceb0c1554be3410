//! Analysis history CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Args, Subcommand};

use crate::cli::display::{action_success, colorize_label, list_table, render_list, render_result};
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, HistoryEntry};
use crate::infrastructure::setup::open_history_store;
use crate::services::{HistoryCache, HistorySelector};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List recent analyses, most recent first
    List,
    /// Show one analysis in full
    Show {
        /// Position in the list (1 = most recent) or entry id
        selector: String,
    },
    /// Delete all saved analyses
    Clear,
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryListOutput {
    pub entries: Vec<HistoryEntry>,
}

impl CommandOutput for HistoryListOutput {
    fn to_human(&self) -> String {
        render_history_table(&self.entries)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryShowOutput {
    pub entry: HistoryEntry,
}

impl CommandOutput for HistoryShowOutput {
    fn to_human(&self) -> String {
        format!(
            "{}\n{}\n\n{}",
            format_timestamp(self.entry.timestamp),
            self.entry.text,
            render_result(&self.entry.result)
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryClearOutput {
    pub removed: usize,
}

impl CommandOutput for HistoryClearOutput {
    fn to_human(&self) -> String {
        action_success(&format!("Cleared {} history entries", self.removed))
    }
}

/// Table of entries with their 1-based positions.
pub fn render_history_table(entries: &[HistoryEntry]) -> String {
    let mut table = list_table(&["#", "Label", "Confidence", "When", "Text"]);
    for (index, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            colorize_label(entry.result.label).to_string(),
            format!("{:.1}%", entry.result.confidence),
            format_timestamp(entry.timestamp),
            truncate(&entry.preview(60), 60),
        ]);
    }
    render_list("history entry", "history entries", table, entries.len())
}

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub async fn execute(args: HistoryArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = open_history_store(&config.history).await;
    let mut history = HistoryCache::load(store, config.history.capacity).await;

    match args.command {
        HistoryCommands::List => {
            let out = HistoryListOutput {
                entries: history.entries().to_vec(),
            };
            output(&out, json_mode);
        }
        HistoryCommands::Show { selector } => {
            let selector: HistorySelector = selector.parse()?;
            let entry = match selector {
                HistorySelector::Index(position) => history.get_index(position),
                HistorySelector::Id(id) => history.get(id),
            }
            .cloned()
            .with_context(|| format!("No history entry matches {selector:?}"))?;
            output(&HistoryShowOutput { entry }, json_mode);
        }
        HistoryCommands::Clear => {
            let removed = history.len();
            history.clear().await;
            output(&HistoryClearOutput { removed }, json_mode);
        }
    }

    Ok(())
}
