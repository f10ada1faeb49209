// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for arcsmith CLI

pub mod analyze;
pub mod config;
pub mod score;
pub mod solve;
pub mod validate;
pub mod work;

pub use self::analyze::AnalyzeArgs;
pub use self::config::ConfigCommand;
pub use self::score::ScoreArgs;
pub use self::solve::SolveArgs;
pub use self::validate::ValidateArgs;
pub use self::work::WorkCommand;

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use arcsmith_core::domain::solver_config::DatasetConfig;
use arcsmith_core::domain::task::{ChallengeSet, SolutionSet};
use arcsmith_core::infrastructure::dataset::{
    ChallengeRepository, FileChallengeRepository, InMemoryChallengeRepository,
};

/// Where challenges and solutions come from. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetArgs {
    /// Directory containing arc-agi_*.json files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Challenge file (skips discovery)
    #[arg(long, value_name = "FILE")]
    pub challenges: Option<PathBuf>,

    /// Use the built-in demo tasks
    #[arg(long, conflicts_with_all = ["data_dir", "challenges"])]
    pub demo: bool,
}

impl DatasetArgs {
    pub fn repository(
        &self,
        config: &DatasetConfig,
        solutions: Option<PathBuf>,
    ) -> Box<dyn ChallengeRepository> {
        if self.demo {
            return Box::new(InMemoryChallengeRepository::demo());
        }
        let data_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| config.data_dir.clone());
        let challenges = self
            .challenges
            .clone()
            .or_else(|| config.challenges_file.clone());
        let solutions = solutions.or_else(|| config.solutions_file.clone());
        Box::new(FileChallengeRepository::new(data_dir).with_files(challenges, solutions))
    }
}

/// Ground truth for `challenges`: the solution file when the dataset has one,
/// else outputs embedded in the challenge file. `None` when neither exists.
pub(crate) async fn load_ground_truth(
    repository: &dyn ChallengeRepository,
    challenges: &ChallengeSet,
) -> Result<Option<SolutionSet>> {
    let solutions = match repository
        .load_solutions()
        .await
        .context("Failed to load solutions")?
    {
        Some(solutions) => solutions,
        // Some evaluation dumps embed outputs in the challenge file
        None => SolutionSet::from_embedded(challenges),
    };
    let solutions = solutions.restricted_to(challenges);
    Ok((!solutions.is_empty()).then_some(solutions))
}

pub(crate) fn read_json_file(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
