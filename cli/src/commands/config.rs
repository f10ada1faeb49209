// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use arcsmith_core::domain::solver_config::{SolverConfigManifest, CONFIG_PATH_ENV};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./arcsmith-config.yaml)
        #[arg(short, long, default_value = "./arcsmith-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, yaml: bool) -> Result<()> {
    let config = SolverConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./arcsmith-config.yaml");
        println!("  4. ~/.arcsmith/config.yaml");
        println!("  5. /etc/arcsmith/config.yaml");
        println!();
    }

    if yaml {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let spec = &config.spec;
    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    println!("{}", "Dataset:".bold());
    println!("  Data dir: {}", spec.dataset.data_dir.display());
    if let Some(file) = &spec.dataset.challenges_file {
        println!("  Challenges: {}", file.display());
    }
    if let Some(file) = &spec.dataset.solutions_file {
        println!("  Solutions: {}", file.display());
    }
    println!();

    println!("{}", "Solver:".bold());
    println!("  Detectors: {}", spec.solver.detectors.join(", "));
    println!("  Min confidence: {}", spec.solver.min_confidence);
    println!("  Second attempt: {:?}", spec.solver.second_attempt);
    println!("  Workers: {}", spec.runtime.workers);
    println!();

    println!("{}", "Output:".bold());
    println!("  Submission: {}", spec.output.submission_path.display());
    println!(
        "  Report: {}",
        spec.output
            .report_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(beside submission)".to_string())
    );
    println!(
        "  Logging: {} ({})",
        spec.observability.log_level, spec.observability.log_format
    );

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = SolverConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    std::fs::write(&output, template(with_examples))
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn template(with_examples: bool) -> &'static str {
    if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    }
}
