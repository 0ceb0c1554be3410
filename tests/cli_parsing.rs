use clap::Parser;
use std::path::PathBuf;

use veritas::cli::commands::history::HistoryCommands;
use veritas::cli::commands::live::LiveInput;
use veritas::cli::types::{Cli, Commands};
use veritas::RewriteStyle;

#[test]
fn test_parse_init_defaults() {
    let cli = Cli::try_parse_from(["veritas", "init"]).unwrap();

    match cli.command {
        Commands::Init(args) => {
            assert!(!args.force);
            assert_eq!(args.path, PathBuf::from("."));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_init_force_with_path() {
    let cli = Cli::try_parse_from(["veritas", "init", "--force", "/tmp/project"]).unwrap();

    match cli.command {
        Commands::Init(args) => {
            assert!(args.force);
            assert_eq!(args.path, PathBuf::from("/tmp/project"));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_live_options() {
    let cli = Cli::try_parse_from(["veritas", "live", "--no-auto", "--quiet-period-ms", "250"]).unwrap();

    match cli.command {
        Commands::Live(args) => {
            assert!(args.no_auto);
            assert_eq!(args.quiet_period_ms, Some(250));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_live_defaults() {
    let cli = Cli::try_parse_from(["veritas", "live"]).unwrap();

    match cli.command {
        Commands::Live(args) => {
            assert!(!args.no_auto);
            assert_eq!(args.quiet_period_ms, None);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_analyze_file() {
    let cli = Cli::try_parse_from(["veritas", "analyze", "--file", "article.txt"]).unwrap();

    match cli.command {
        Commands::Analyze(args) => {
            assert_eq!(args.text, None);
            assert_eq!(args.file, Some(PathBuf::from("article.txt")));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_analyze_text_and_file_conflict() {
    let result = Cli::try_parse_from(["veritas", "analyze", "inline text", "--file", "article.txt"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_history_subcommands() {
    let list = Cli::try_parse_from(["veritas", "history", "list"]).unwrap();
    assert!(matches!(
        list.command,
        Commands::History(ref args) if matches!(args.command, HistoryCommands::List)
    ));

    let clear = Cli::try_parse_from(["veritas", "history", "clear"]).unwrap();
    assert!(matches!(
        clear.command,
        Commands::History(ref args) if matches!(args.command, HistoryCommands::Clear)
    ));
}

#[test]
fn test_parse_sample_exclusion() {
    let cli = Cli::try_parse_from(["veritas", "sample", "--not", "Old headline"]).unwrap();

    match cli.command {
        Commands::Sample(args) => assert_eq!(args.not.as_deref(), Some("Old headline")),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_json_flag_is_global() {
    let cli = Cli::try_parse_from(["veritas", "--json", "history", "list"]).unwrap();
    assert!(cli.json);

    let cli = Cli::try_parse_from(["veritas", "sample", "-j"]).unwrap();
    assert!(cli.json);
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["veritas", "frobnicate"]).is_err());
}

#[test]
fn test_live_session_input_lines() {
    assert_eq!(":analyze".parse::<LiveInput>().unwrap(), LiveInput::Analyze);
    assert_eq!(
        ":rewrite neutral".parse::<LiveInput>().unwrap(),
        LiveInput::Rewrite(RewriteStyle::Neutral)
    );
    assert_eq!(
        "Markets steady after vote".parse::<LiveInput>().unwrap(),
        LiveInput::Text("Markets steady after vote".to_string())
    );
    assert!(":frobnicate".parse::<LiveInput>().is_err());
}
