//! Implementation of the `veritas sample` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::services::SampleProvider;

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Never return this text (e.g. the one you just tried)
    #[arg(long)]
    pub not: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct SampleOutput {
    pub text: String,
}

impl CommandOutput for SampleOutput {
    fn to_human(&self) -> String {
        self.text.clone()
    }
}

pub async fn execute(args: SampleArgs, json_mode: bool) -> Result<()> {
    let provider = SampleProvider::default();
    let text = provider
        .pick(args.not.as_deref().unwrap_or_default())
        .context("No samples available")?
        .to_string();

    output(&SampleOutput { text }, json_mode);
    Ok(())
}
