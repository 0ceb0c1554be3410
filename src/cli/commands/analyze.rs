//! Implementation of the `veritas analyze` command.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

use crate::cli::display::{create_spinner, render_result};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AnalysisResult, Config, EditSource, SequenceNumber};
use crate::infrastructure::setup::bootstrap;
use crate::services::EngineHandle;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text to analyze (reads stdin when neither TEXT nor --file is given)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
pub struct AnalyzeOutput {
    pub text: String,
    pub result: AnalysisResult,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        render_result(&self.result)
    }
}

fn read_input(args: &AnalyzeArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read text from stdin")?;
    Ok(buffer)
}

/// Analyze whatever the engine's document holds right now and wait for
/// that request's verdict. The verdict is already in history on return.
pub async fn analyze_current(handle: &EngineHandle, json_mode: bool) -> Result<AnalysisResult> {
    let Some(sequence) = handle.analyze().await? else {
        bail!("Nothing to analyze: the text is blank");
    };

    let spinner = create_spinner("Analyzing...", json_mode);
    let outcome = wait_for_verdict(handle, sequence).await;
    spinner.finish_and_clear();
    outcome
}

async fn wait_for_verdict(handle: &EngineHandle, sequence: SequenceNumber) -> Result<AnalysisResult> {
    let view = handle
        .wait_until(|v| v.result_sequence == Some(sequence) || (!v.pending && v.error.is_some()))
        .await?;
    match (view.result, view.error) {
        (Some(result), _) if view.result_sequence == Some(sequence) => Ok(result),
        (_, Some(error)) => bail!(error),
        _ => bail!("Analysis finished without a verdict"),
    }
}

pub async fn execute(args: AnalyzeArgs, config: &Config, json_mode: bool) -> Result<()> {
    let text = read_input(&args)?;
    if text.trim().is_empty() {
        bail!("Nothing to analyze: the text is blank");
    }

    let handle = bootstrap(config).await?;
    handle.edit(text.clone(), EditSource::Paste).await?;
    let outcome = analyze_current(&handle, json_mode).await;
    handle.shutdown().await?;

    output(&AnalyzeOutput { text, result: outcome? }, json_mode);
    Ok(())
}
