//! Implementation of the `veritas live` interactive session.
//!
//! Plain input lines are appended to the document as typing; lines starting
//! with `:` are session commands. The engine view is re-rendered whenever it
//! changes.

use anyhow::Result;
use clap::Args;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::commands::history::render_history_table;
use crate::cli::display::{action_failure, action_success, render_view};
use crate::domain::models::{Config, RewriteStyle};
use crate::infrastructure::setup::bootstrap;
use crate::services::{AnalysisView, EngineHandle, HistorySelector};

const HELP: &str = "\
Type text to add it to the document; analysis runs after a quiet period.
  :analyze              analyze now
  :sample               load a random sample
  :rewrite <style>      neutral | declickbait | formal
  :scan <url>           replace the text with an article
  :history              list saved analyses
  :load <n|id>          show a saved analysis again
  :clear-history        delete saved analyses
  :auto on|off          toggle analysis while typing
  :reset                clear text and verdict
  :quit                 leave";

#[derive(Args, Debug)]
pub struct LiveArgs {
    /// Start with analysis-while-typing disabled
    #[arg(long)]
    pub no_auto: bool,

    /// Override the quiet period in milliseconds
    #[arg(long, value_name = "MS")]
    pub quiet_period_ms: Option<u64>,
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveInput {
    Text(String),
    Analyze,
    Sample,
    Rewrite(RewriteStyle),
    Scan(String),
    History,
    Load(HistorySelector),
    ClearHistory,
    Auto(bool),
    Reset,
    Help,
    Quit,
}

impl FromStr for LiveInput {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Text(line.to_string()));
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command.trim(), ""),
        };

        match (name, arg) {
            ("analyze" | "a", "") => Ok(Self::Analyze),
            ("sample", "") => Ok(Self::Sample),
            ("rewrite", style) => style
                .parse::<RewriteStyle>()
                .map(Self::Rewrite)
                .map_err(|e| e.to_string()),
            ("scan", "") => Err("usage: :scan <url>".to_string()),
            ("scan", url) => Ok(Self::Scan(url.to_string())),
            ("history", "") => Ok(Self::History),
            ("load", selector) => selector
                .parse::<HistorySelector>()
                .map(Self::Load)
                .map_err(|e| e.to_string()),
            ("clear-history", "") => Ok(Self::ClearHistory),
            ("auto", "on") => Ok(Self::Auto(true)),
            ("auto", "off") => Ok(Self::Auto(false)),
            ("auto", _) => Err("usage: :auto on|off".to_string()),
            ("reset", "") => Ok(Self::Reset),
            ("help" | "h" | "?", "") => Ok(Self::Help),
            ("quit" | "q" | "exit", "") => Ok(Self::Quit),
            _ => Err(format!("unknown command :{command} (try :help)")),
        }
    }
}

fn print_view(view: &AnalysisView, json_mode: bool) {
    if json_mode {
        // One JSON document per line so the stream can be piped.
        println!("{}", serde_json::to_string(view).unwrap_or_default());
    } else {
        println!("\n{}", render_view(view));
    }
}

/// Apply one input line. Returns `false` when the session should end.
async fn dispatch(handle: &EngineHandle, input: LiveInput, json_mode: bool) -> Result<bool> {
    match input {
        LiveInput::Text(line) => {
            handle.append(line).await?;
        }
        LiveInput::Analyze => {
            if handle.analyze().await?.is_none() {
                eprintln!("{}", action_failure("Nothing to analyze"));
            }
        }
        LiveInput::Sample => {
            handle.load_sample().await?;
        }
        LiveInput::Rewrite(style) => {
            handle.rewrite(style).await?;
        }
        LiveInput::Scan(url) => {
            // Scans run alongside further input; the engine rejects overlaps.
            let handle = handle.clone();
            tokio::spawn(async move {
                match handle.scan_url(url.as_str()).await {
                    Ok(page) => {
                        let title = page.title.unwrap_or_else(|| url.clone());
                        eprintln!("{}", action_success(&format!("Loaded {title}")));
                    }
                    Err(e) => eprintln!("{}", action_failure(&e.to_string())),
                }
            });
        }
        LiveInput::History => {
            let entries = handle.history().await?;
            if json_mode {
                println!("{}", serde_json::to_string(&entries).unwrap_or_default());
            } else {
                println!("{}", render_history_table(&entries));
            }
        }
        LiveInput::Load(selector) => {
            if let Err(e) = handle.load_history(selector).await {
                eprintln!("{}", action_failure(&e.to_string()));
            }
        }
        LiveInput::ClearHistory => {
            handle.clear_history().await?;
            eprintln!("{}", action_success("History cleared"));
        }
        LiveInput::Auto(enabled) => handle.set_auto_analyze(enabled).await?,
        LiveInput::Reset => handle.reset().await?,
        LiveInput::Help => eprintln!("{HELP}"),
        LiveInput::Quit => return Ok(false),
    }
    Ok(true)
}

pub async fn execute(args: LiveArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut config = config.clone();
    if args.no_auto {
        config.debounce.auto_analyze = false;
    }
    if let Some(ms) = args.quiet_period_ms.filter(|ms| *ms > 0) {
        config.debounce.quiet_period_ms = ms;
    }

    let handle = bootstrap(&config).await?;

    let mut views = handle.subscribe();
    let renderer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            print_view(&view, json_mode);
        }
    });

    if !json_mode {
        eprintln!("{HELP}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<LiveInput>() {
            Ok(input) => {
                if !dispatch(&handle, input, json_mode).await? {
                    break;
                }
            }
            Err(message) => eprintln!("{}", action_failure(&message)),
        }
    }

    handle.shutdown().await?;
    renderer.abort();
    Ok(())
}
