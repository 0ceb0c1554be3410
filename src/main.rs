//! Veritas CLI entry point.

use anyhow::Result;
use clap::Parser;

use veritas::cli::{commands, Cli, Commands};
use veritas::domain::models::Config;
use veritas::infrastructure::config::ConfigLoader;
use veritas::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    // `init` must work even when an existing config is broken.
    let config = match (&cli.command, load_config(&cli)) {
        (_, Ok(config)) => config,
        (Commands::Init(_), Err(_)) => Config::default(),
        (_, Err(err)) => veritas::cli::handle_error(err, json_mode),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, json_mode).await,
        Commands::Live(args) => commands::live::execute(args, &config, json_mode).await,
        Commands::Analyze(args) => commands::analyze::execute(args, &config, json_mode).await,
        Commands::Scan(args) => commands::scan::execute(args, &config, json_mode).await,
        Commands::History(args) => commands::history::execute(args, &config, json_mode).await,
        Commands::Sample(args) => commands::sample::execute(args, json_mode).await,
    };

    if let Err(err) = result {
        veritas::cli::handle_error(err, json_mode);
    }
}
