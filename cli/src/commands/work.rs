// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Creative work attribution commands
//!
//! Commands: check, passport

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use arcsmith_core::domain::attribution::{AttributionPolicy, CreativeWork};

use super::read_json_file;

#[derive(Subcommand, Debug, Clone)]
pub enum WorkCommand {
    /// Check a work against the attribution policy
    Check {
        /// Work JSON file
        #[arg(value_name = "WORK")]
        file: PathBuf,
    },

    /// Check, finalize and print the work's passport
    Passport {
        /// Work JSON file
        #[arg(value_name = "WORK")]
        file: PathBuf,

        /// Originality score in [0, 1]
        #[arg(long, default_value_t = 1.0)]
        originality: f64,

        /// Write the finalized work back to this path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

pub async fn handle_command(command: WorkCommand) -> Result<()> {
    match command {
        WorkCommand::Check { file } => {
            check(&file, &AttributionPolicy::default()).map(|_| ())
        }
        WorkCommand::Passport {
            file,
            originality,
            output,
        } => passport(&file, originality, output),
    }
}

fn load_work(path: &Path) -> Result<CreativeWork> {
    serde_json::from_value(read_json_file(path)?)
        .with_context(|| format!("{} is not a valid creative work", path.display()))
}

fn check(path: &Path, policy: &AttributionPolicy) -> Result<CreativeWork> {
    let work = load_work(path)?;
    policy
        .check(&work)
        .with_context(|| format!("'{}' violates the attribution policy", work.title))?;

    println!(
        "{} '{}' ({} contributions, {:.0}% human)",
        "✓".green(),
        work.title,
        work.contributions.len(),
        work.human_share() * 100.0
    );
    Ok(work)
}

fn passport(path: &Path, originality: f64, output: Option<PathBuf>) -> Result<()> {
    let policy = AttributionPolicy::default();
    let mut work = check(path, &policy)?;
    let passport = work
        .finalize(originality, &policy)
        .context("Failed to issue passport")?
        .clone();

    println!("{}", serde_json::to_string_pretty(&passport)?);

    if let Some(output) = output {
        std::fs::write(&output, serde_json::to_string_pretty(&work)?)
            .with_context(|| format!("Failed to write work to {}", output.display()))?;
        println!(
            "{}",
            format!("✓ Finalized work written: {}", output.display()).green()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcsmith_core::domain::attribution::{
        ContributionType, CreativeContribution, WorkStatus,
    };

    fn write_work(dir: &Path, work: &CreativeWork) -> PathBuf {
        let path = dir.join("work.json");
        std::fs::write(&path, serde_json::to_string(work).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_passport_finalizes_work() {
        let dir = tempfile::tempdir().unwrap();
        let work = CreativeWork::new("owner", "Atlas", "book", "maps of imaginary places");
        let path = write_work(dir.path(), &work);
        let output = dir.path().join("final.json");

        handle_command(WorkCommand::Passport {
            file: path,
            originality: 0.7,
            output: Some(output.clone()),
        })
        .await
        .unwrap();

        let finalized = load_work(&output).unwrap();
        assert_eq!(finalized.status, WorkStatus::Reviewing);
        assert_eq!(finalized.passport.unwrap().originality_score, 0.7);
    }

    #[tokio::test]
    async fn test_check_rejects_ai_heavy_work() {
        let dir = tempfile::tempdir().unwrap();
        let mut work = CreativeWork::new("owner", "Atlas", "book", "concept");
        work.add_contribution(CreativeContribution::new("model", ContributionType::Ai, "chapter"));
        let path = write_work(dir.path(), &work);

        assert!(handle_command(WorkCommand::Check { file: path }).await.is_err());
    }
}
