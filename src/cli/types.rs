//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{
    analyze::AnalyzeArgs, history::HistoryArgs, init::InitArgs, live::LiveArgs, sample::SampleArgs,
    scan::ScanArgs,
};

#[derive(Parser, Debug)]
#[command(name = "veritas")]
#[command(about = "Veritas - live authenticity analysis for news text", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .veritas/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Veritas configuration and database
    Init(InitArgs),

    /// Interactive session that re-analyzes text as you edit it
    Live(LiveArgs),

    /// Analyze one text immediately
    Analyze(AnalyzeArgs),

    /// Fetch article text from a URL
    Scan(ScanArgs),

    /// Analysis history commands
    History(HistoryArgs),

    /// Print a random sample headline
    Sample(SampleArgs),
}
