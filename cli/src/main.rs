// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # arcsmith CLI
//!
//! Solves ARC Prize tasks with whole-grid transformation heuristics and
//! produces a competition-ready `submission.json`.
//!
//! ## Commands
//!
//! - `arcsmith solve` - Predict every task and write the submission
//! - `arcsmith validate <SUBMISSION>` - Check a submission against the schema
//! - `arcsmith score <SUBMISSION>` - Score a submission against ground truth
//! - `arcsmith analyze` - Complexity profile of a challenge set
//! - `arcsmith config show|validate|generate` - Configuration management
//! - `arcsmith work check|passport` - Creative work attribution

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use arcsmith_cli::commands::{
    self, AnalyzeArgs, ConfigCommand, ScoreArgs, SolveArgs, ValidateArgs, WorkCommand,
};
use arcsmith_cli::logging::{init_logging, LogFormat};
use arcsmith_core::domain::solver_config::{ObservabilityConfig, SolverConfigManifest};

/// arcsmith - ARC Prize heuristic solver
#[derive(Parser)]
#[command(name = "arcsmith")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "ARCSMITH_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ARCSMITH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (compact, pretty, json)
    #[arg(long, global = true, env = "ARCSMITH_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every task and write a submission
    Solve(SolveArgs),

    /// Validate a submission file
    Validate(ValidateArgs),

    /// Score a submission against ground truth
    Score(ScoreArgs),

    /// Profile challenge complexity
    Analyze(AnalyzeArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Creative work attribution
    Work {
        #[command(subcommand)]
        command: WorkCommand,
    },
}

/// Log settings from the config file. No subscriber is installed yet, so the
/// loader's own log lines are dropped here and emitted by the second load.
fn configured_observability(path: Option<PathBuf>) -> ObservabilityConfig {
    SolverConfigManifest::load_or_default(path)
        .map(|config| config.spec.observability)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let observability = configured_observability(cli.config.clone());
    let level = cli.log_level.unwrap_or(observability.log_level);
    let format: LogFormat = cli
        .log_format
        .unwrap_or(observability.log_format)
        .parse()?;
    init_logging(&level, format)?;

    // A broken config only matters to commands that use it
    let config = SolverConfigManifest::load_or_default(cli.config.clone());

    match cli.command {
        Some(Commands::Solve(args)) => commands::solve::execute(args, config?).await.map(|_| ()),
        Some(Commands::Validate(args)) => commands::validate::execute(args, config?).await,
        Some(Commands::Score(args)) => commands::score::execute(args, config?).await.map(|_| ()),
        Some(Commands::Analyze(args)) => commands::analyze::execute(args, config?).await,
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Work { command }) => commands::work::handle_command(command).await,
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_solve_flags() {
        let cli = Cli::try_parse_from([
            "arcsmith",
            "solve",
            "--demo",
            "--max-tasks",
            "2",
            "--second-attempt",
            "duplicate",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Solve(args)) => {
                assert!(args.dataset.demo);
                assert_eq!(args.max_tasks, Some(2));
                assert!(args.second_attempt.is_some());
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_log_settings_come_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "apiVersion: arcsmith/v1\nkind: SolverConfig\nmetadata:\n  name: quiet\n\
             spec:\n  observability:\n    log_level: warn\n    log_format: json\n",
        )
        .unwrap();

        let observability = configured_observability(Some(path));
        assert_eq!(observability.log_level, "warn");
        assert_eq!(observability.log_format, "json");

        let missing = configured_observability(Some(dir.path().join("absent.yaml")));
        assert_eq!(missing.log_level, ObservabilityConfig::default().log_level);
    }

    #[test]
    fn test_demo_conflicts_with_data_dir() {
        assert!(Cli::try_parse_from(["arcsmith", "analyze", "--demo", "--data-dir", "."]).is_err());
    }
}
