// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Dataset Repository Interface
//!
//! Source of challenge and solution sets. Implemented in
//! `crate::infrastructure::dataset` by `FileChallengeRepository` (Kaggle-style
//! `arc-agi_*.json` files) and `InMemoryChallengeRepository` (demo data, tests).

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::task::{ChallengeSet, SolutionSet};

#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// Human-readable origin, e.g. the challenge file path
    fn describe(&self) -> String;

    async fn load_challenges(&self) -> Result<ChallengeSet, DatasetError>;

    /// `None` when the dataset ships without ground truth (hidden test set)
    async fn load_solutions(&self) -> Result<Option<SolutionSet>, DatasetError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("No ARC challenge file found in {0}")]
    NotFound(PathBuf),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
