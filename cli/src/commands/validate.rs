// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `arcsmith validate`: check a submission file against the challenge set

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use arcsmith_core::domain::submission::validate_submission;
use arcsmith_core::domain::solver_config::SolverConfigManifest;

use super::{read_json_file, DatasetArgs};

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Submission file to check
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ValidateArgs, config: SolverConfigManifest) -> Result<()> {
    let document = read_json_file(&args.submission)?;
    let challenges = args
        .dataset
        .repository(&config.spec.dataset, None)
        .load_challenges()
        .await
        .context("Failed to load challenges")?;

    let report = validate_submission(&document, &challenges);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Checked {} of {} tasks in {}",
            report.tasks_checked,
            challenges.len(),
            args.submission.display()
        );
        for violation in &report.violations {
            println!("  {} {}", "✗".red(), violation);
        }
    }

    if !report.is_valid() {
        bail!(
            "Submission has {} schema violation(s)",
            report.violations.len()
        );
    }

    if !args.json {
        println!("{}", "✓ Submission is valid".green());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: PathBuf) -> ValidateArgs {
        ValidateArgs {
            submission: path,
            dataset: DatasetArgs {
                demo: true,
                ..Default::default()
            },
            json: false,
        }
    }

    #[tokio::test]
    async fn test_invalid_submission_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submission.json");
        std::fs::write(&path, r#"{"enhanced_demo_001": []}"#).unwrap();

        let err = execute(args(path), SolverConfigManifest::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("schema violation"));
    }

    #[tokio::test]
    async fn test_unreadable_submission_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(execute(args(path), SolverConfigManifest::default())
            .await
            .is_err());
    }
}
