// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `arcsmith score`: score a submission against ground truth

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use arcsmith_core::domain::scoring::{score_submission, ScoreReport};
use arcsmith_core::domain::submission::Submission;
use arcsmith_core::domain::solver_config::SolverConfigManifest;
use arcsmith_core::domain::task::SolutionSet;

use super::{load_ground_truth, read_json_file, DatasetArgs};

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Submission file to score
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// Solution file (default: discovered next to the challenges)
    #[arg(long, value_name = "FILE")]
    pub solutions: Option<PathBuf>,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: ScoreArgs, config: SolverConfigManifest) -> Result<ScoreReport> {
    let submission: Submission = serde_json::from_value(read_json_file(&args.submission)?)
        .with_context(|| format!("{} is not a valid submission", args.submission.display()))?;

    let solutions = load_solutions(&args, &config).await?;
    let report = score_submission(&submission, &solutions);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    for task in &report.tasks {
        let marker = if task.solved == task.test_cases {
            "✓".green()
        } else if task.solved > 0 {
            "~".yellow()
        } else {
            "✗".red()
        };
        println!(
            "  {} {} {}/{}",
            marker, task.task_id, task.solved, task.test_cases
        );
    }
    if !report.missing.is_empty() {
        println!(
            "  {}",
            format!("{} task(s) missing from the submission", report.missing.len()).yellow()
        );
    }
    if !report.unscored.is_empty() {
        println!(
            "  {}",
            format!("{} task(s) without ground truth", report.unscored.len()).dimmed()
        );
    }
    println!();
    println!(
        "{} {:.3} / {} ({:.2}%)",
        "Score:".bold(),
        report.total_score,
        report.tasks_scored,
        report.accuracy() * 100.0
    );

    Ok(report)
}

async fn load_solutions(args: &ScoreArgs, config: &SolverConfigManifest) -> Result<SolutionSet> {
    let repository = args
        .dataset
        .repository(&config.spec.dataset, args.solutions.clone());
    let challenges = repository
        .load_challenges()
        .await
        .context("Failed to load challenges")?;

    load_ground_truth(repository.as_ref(), &challenges)
        .await?
        .ok_or_else(|| {
            anyhow!(
                "No ground truth for {}. Pass --solutions FILE",
                repository.describe()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_score_against_demo_solutions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submission.json");
        std::fs::write(
            &path,
            r#"{"enhanced_demo_002": [{"attempt_1": [[0]], "attempt_2": [[1,1,1],[1,1,1],[1,1,1]]}]}"#,
        )
        .unwrap();

        let args = ScoreArgs {
            submission: path,
            solutions: None,
            dataset: DatasetArgs {
                demo: true,
                ..Default::default()
            },
            json: true,
        };
        let report = execute(args, SolverConfigManifest::default()).await.unwrap();
        // Demo ground truth has three tasks; the two left out score zero
        assert_eq!(report.tasks_scored, 3);
        assert_eq!(report.missing.len(), 2);
        let scored = report
            .tasks
            .iter()
            .find(|t| t.task_id.as_str() == "enhanced_demo_002")
            .unwrap();
        assert_eq!(scored.solved_by, vec![Some(2)]);
        assert!((report.accuracy() - 1.0 / 3.0).abs() < 1e-9);
    }
}
