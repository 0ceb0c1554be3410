//! Implementation of the `veritas scan` command.

use anyhow::Result;
use clap::Args;

use crate::cli::commands::analyze::analyze_current;
use crate::cli::display::{create_spinner, render_result};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AnalysisResult, Config};
use crate::infrastructure::setup::bootstrap;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Article URL
    pub url: String,

    /// Analyze the extracted text right away
    #[arg(short, long)]
    pub analyze: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ScanOutput {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
}

impl CommandOutput for ScanOutput {
    fn to_human(&self) -> String {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(console::style(title).bold().to_string());
        }
        parts.push(self.text.clone());
        if let Some(result) = &self.result {
            parts.push(String::new());
            parts.push(render_result(result));
        }
        parts.join("\n")
    }
}

pub async fn execute(args: ScanArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut config = config.clone();
    // The text is analyzed explicitly below or not at all.
    config.debounce.auto_analyze = false;
    let handle = bootstrap(&config).await?;

    let spinner = create_spinner(format!("Fetching {}", args.url), json_mode);
    let scanned = handle.scan_url(&args.url).await;
    spinner.finish_and_clear();

    let outcome = match scanned {
        Ok(page) if args.analyze => analyze_current(&handle, json_mode).await.map(|result| (page, Some(result))),
        Ok(page) => Ok((page, None)),
        Err(e) => Err(e.into()),
    };
    handle.shutdown().await?;
    let (page, result) = outcome?;

    let out = ScanOutput {
        url: args.url,
        title: page.title,
        text: page.text,
        result,
    };
    output(&out, json_mode);
    Ok(())
}
