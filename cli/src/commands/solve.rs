// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `arcsmith solve`: predict every task and write `submission.json`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use arcsmith_core::application::solve_service::{SolveRun, SolveService};
use arcsmith_core::domain::events::{RunId, SolveEvent};
use arcsmith_core::domain::scoring::{score_submission, ScoreReport};
use arcsmith_core::domain::solver::SecondAttempt;
use arcsmith_core::domain::solver_config::SolverConfigManifest;
use arcsmith_core::infrastructure::dataset::{default_report_path, write_report, write_submission};
use arcsmith_core::infrastructure::event_bus::{EventBus, EventBusError, RunEventReceiver};

use super::{load_ground_truth, DatasetArgs};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Solution file used to score the run when available
    #[arg(long, value_name = "FILE")]
    pub solutions: Option<PathBuf>,

    /// Submission output path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run report path (default: <output stem>.report.json)
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Solve only the first N tasks in id order
    #[arg(long, value_name = "N")]
    pub max_tasks: Option<usize>,

    /// Tasks solved concurrently
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Second attempt policy (runner-up, duplicate)
    #[arg(long, value_name = "MODE")]
    pub second_attempt: Option<SecondAttempt>,

    /// Pretty-print the submission JSON
    #[arg(long)]
    pub pretty: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Returns the score when ground truth is available for the solved tasks.
pub async fn execute(
    args: SolveArgs,
    mut config: SolverConfigManifest,
) -> Result<Option<ScoreReport>> {
    if let Some(workers) = args.workers {
        config.spec.runtime.workers = workers;
    }
    if let Some(mode) = args.second_attempt {
        config.spec.solver.second_attempt = mode;
    }
    config.validate().context("Invalid solver configuration")?;

    let spec = &config.spec;
    let repository = args.dataset.repository(&spec.dataset, args.solutions.clone());
    let mut challenges = repository
        .load_challenges()
        .await
        .context("Failed to load challenges")?;
    if let Some(n) = args.max_tasks {
        challenges = challenges.take(n);
    }
    info!(source = %repository.describe(), tasks = challenges.len(), "Dataset ready");
    let ground_truth = load_ground_truth(repository.as_ref(), &challenges).await?;

    let solver = spec
        .solver
        .build_solver()
        .context("Failed to build solver")?;
    let event_bus = EventBus::with_default_capacity();
    let run_id = RunId::new();
    let progress = spawn_progress(
        event_bus.subscribe_run(run_id),
        challenges.len() as u64,
        args.quiet,
    );

    let service = SolveService::new(Arc::new(solver), event_bus, spec.runtime.workers);
    let run = service.solve_all_with_id(run_id, challenges).await?;
    progress.await.context("Progress reporter failed")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| spec.output.submission_path.clone());
    let report_path = args
        .report
        .clone()
        .or_else(|| spec.output.report_path.clone())
        .unwrap_or_else(|| default_report_path(&output));
    let pretty = args.pretty || spec.output.pretty;

    write_submission(&output, &run.submission, pretty)
        .await
        .context("Failed to write submission")?;
    write_report(&report_path, &run.report(Some(repository.describe())))
        .await
        .context("Failed to write run report")?;

    print_summary(&run);
    println!("  Submission: {}", output.display());
    println!("  Report:     {}", report_path.display());

    let score = ground_truth.map(|solutions| score_submission(&run.submission, &solutions));
    if let Some(score) = &score {
        println!();
        println!(
            "{} {:.2}% ({} of {} tasks fully solved)",
            "Accuracy:".bold(),
            score.accuracy() * 100.0,
            score.fully_solved(),
            score.tasks_scored
        );
    }

    Ok(score)
}

fn print_summary(run: &SolveRun) {
    let stats = &run.stats;
    println!();
    println!("{}", "✓ Solve run completed".green());
    println!("  Run ID:     {}", run.run_id);
    println!("  Tasks:      {}", stats.tasks);
    println!("  Test cases: {}", stats.test_cases);
    println!(
        "  Elapsed:    {} ms ({:.1} tasks/sec)",
        stats.elapsed_ms, stats.tasks_per_second
    );
    if stats.fallbacks > 0 {
        println!(
            "  {}",
            format!("Fallbacks:  {}", stats.fallbacks).yellow()
        );
    }
    println!("  Transformations:");
    for (kind, count) in &stats.transformations {
        println!("    {:<12} {}", kind, count);
    }
}

fn spawn_progress(
    mut receiver: RunEventReceiver,
    total: u64,
    quiet: bool,
) -> tokio::task::JoinHandle<()> {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total)
    };
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        bar.set_style(style.progress_chars("=>-"));
    }

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(SolveEvent::TaskSolved {
                    task_id,
                    transformation,
                    ..
                }) => {
                    bar.set_message(format!("{} ({})", task_id, transformation));
                    bar.inc(1);
                }
                Ok(SolveEvent::TaskFallback { task_id, .. }) => {
                    bar.set_message(format!("{} (fallback)", task_id));
                    bar.inc(1);
                }
                Ok(SolveEvent::RunCompleted { .. }) | Err(EventBusError::Closed) => break,
                Ok(SolveEvent::RunStarted { .. }) | Err(_) => {}
            }
        }
        bar.finish_and_clear();
    })
}
