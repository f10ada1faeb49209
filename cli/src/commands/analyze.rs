// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `arcsmith analyze`: complexity profile of a challenge set

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use arcsmith_core::domain::analysis::ComplexitySummary;
use arcsmith_core::domain::solver_config::SolverConfigManifest;

use super::DatasetArgs;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: AnalyzeArgs, config: SolverConfigManifest) -> Result<()> {
    let repository = args.dataset.repository(&config.spec.dataset, None);
    let challenges = repository
        .load_challenges()
        .await
        .context("Failed to load challenges")?;
    let summary = ComplexitySummary::from_challenges(&challenges);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} {}", "Dataset:".bold(), repository.describe());
    println!("  Tasks:       {}", summary.tasks);
    println!("  Test cases:  {}", challenges.test_case_count());
    println!("  Avg cells:   {:.1}", summary.avg_grid_size);
    println!("  Avg colors:  {:.2}", summary.avg_color_count);
    println!("  Avg density: {:.3}", summary.avg_pattern_density);
    if let Some((task_id, cells)) = &summary.largest {
        println!("  Largest:     {} ({} cells)", task_id, cells);
    }
    println!();
    println!("{}", "Difficulty:".bold());
    for (category, count) in &summary.by_category {
        println!("  {:<15} {}", category.as_str(), count);
    }

    Ok(())
}
