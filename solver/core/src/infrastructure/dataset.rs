// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! File-backed and in-memory challenge repositories, plus writers for the
//! submission and run report.
//!
//! Discovery order inside a data directory:
//!
//! 1. `arc-agi_test_challenges.json` (hidden test set, no solutions)
//! 2. `arc-agi_evaluation_challenges.json` + `arc-agi_evaluation_solutions.json`
//! 3. `arc-agi_training_challenges.json` + `arc-agi_training_solutions.json`
//!
//! Kaggle has shipped both `_challenges` and `-challenges` spellings, so each
//! name is also tried with a hyphen.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::submission::Submission;
use crate::domain::task::{ChallengeSet, SolutionSet};

pub use crate::domain::repository::{ChallengeRepository, DatasetError};

const SPLITS: [&str; 3] = ["test", "evaluation", "training"];

/// Challenge file plus its solution file, if one exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub challenges: PathBuf,
    pub solutions: Option<PathBuf>,
}

fn candidate_names(split: &str, kind: &str) -> [String; 2] {
    [
        format!("arc-agi_{split}_{kind}.json"),
        format!("arc-agi_{split}-{kind}.json"),
    ]
}

fn find_file(dir: &Path, split: &str, kind: &str) -> Option<PathBuf> {
    candidate_names(split, kind)
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Locate the first available split in `dir`.
pub fn discover(dir: &Path) -> Result<DatasetFiles, DatasetError> {
    for split in SPLITS {
        if let Some(challenges) = find_file(dir, split, "challenges") {
            // The hidden test set never has published solutions
            let solutions = if split == "test" {
                None
            } else {
                find_file(dir, split, "solutions")
            };
            debug!(split, challenges = %challenges.display(), "Discovered ARC dataset");
            return Ok(DatasetFiles {
                challenges,
                solutions,
            });
        }
    }
    Err(DatasetError::NotFound(dir.to_path_buf()))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub struct FileChallengeRepository {
    data_dir: PathBuf,
    challenges_file: Option<PathBuf>,
    solutions_file: Option<PathBuf>,
}

impl FileChallengeRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            challenges_file: None,
            solutions_file: None,
        }
    }

    /// Use explicit files instead of discovery.
    pub fn with_files(mut self, challenges: Option<PathBuf>, solutions: Option<PathBuf>) -> Self {
        self.challenges_file = challenges;
        self.solutions_file = solutions;
        self
    }

    pub fn files(&self) -> Result<DatasetFiles, DatasetError> {
        match &self.challenges_file {
            Some(challenges) => Ok(DatasetFiles {
                challenges: challenges.clone(),
                solutions: self.solutions_file.clone(),
            }),
            None => {
                let mut files = discover(&self.data_dir)?;
                if self.solutions_file.is_some() {
                    files.solutions = self.solutions_file.clone();
                }
                Ok(files)
            }
        }
    }
}

#[async_trait]
impl ChallengeRepository for FileChallengeRepository {
    fn describe(&self) -> String {
        match self.files() {
            Ok(files) => files.challenges.display().to_string(),
            Err(_) => self.data_dir.display().to_string(),
        }
    }

    async fn load_challenges(&self) -> Result<ChallengeSet, DatasetError> {
        let files = self.files()?;
        let challenges: ChallengeSet = read_json(&files.challenges).await?;
        info!(
            path = %files.challenges.display(),
            tasks = challenges.len(),
            test_cases = challenges.test_case_count(),
            "Loaded challenges"
        );
        Ok(challenges)
    }

    async fn load_solutions(&self) -> Result<Option<SolutionSet>, DatasetError> {
        let Some(path) = self.files()?.solutions else {
            return Ok(None);
        };
        let solutions: SolutionSet = read_json(&path).await?;
        info!(path = %path.display(), tasks = solutions.len(), "Loaded solutions");
        Ok(Some(solutions))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryChallengeRepository {
    challenges: ChallengeSet,
    solutions: Option<SolutionSet>,
}

impl InMemoryChallengeRepository {
    pub fn new(challenges: ChallengeSet, solutions: Option<SolutionSet>) -> Self {
        Self {
            challenges,
            solutions,
        }
    }

    /// The three built-in demo tasks with their solutions.
    pub fn demo() -> Self {
        Self::new(demo_challenges(), Some(demo_solutions()))
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryChallengeRepository {
    fn describe(&self) -> String {
        format!("in-memory ({} tasks)", self.challenges.len())
    }

    async fn load_challenges(&self) -> Result<ChallengeSet, DatasetError> {
        Ok(self.challenges.clone())
    }

    async fn load_solutions(&self) -> Result<Option<SolutionSet>, DatasetError> {
        Ok(self.solutions.clone())
    }
}

fn demo_challenges_json() -> serde_json::Value {
    json!({
        "enhanced_demo_001": {
            "train": [{"input": [[0, 1, 0], [1, 0, 1], [0, 1, 0]],
                       "output": [[1, 0, 1], [0, 1, 0], [1, 0, 1]]}],
            "test": [{"input": [[0, 0, 1], [1, 1, 0], [0, 0, 1]]}]
        },
        "enhanced_demo_002": {
            "train": [{"input": [[0, 0], [0, 0]], "output": [[1, 1], [1, 1]]}],
            "test": [{"input": [[0, 0, 0], [0, 0, 0], [0, 0, 0]]}]
        },
        "enhanced_demo_003": {
            "train": [{"input": [[1, 0, 1]],
                       "output": [[0, 1, 0], [1, 0, 1], [0, 1, 0]]}],
            "test": [{"input": [[1, 1]]}]
        }
    })
}

fn demo_solutions_json() -> serde_json::Value {
    json!({
        "enhanced_demo_001": [[[1, 1, 0], [0, 0, 1], [1, 1, 0]]],
        "enhanced_demo_002": [[[1, 1, 1], [1, 1, 1], [1, 1, 1]]],
        "enhanced_demo_003": [[[0, 0], [1, 1], [0, 0]]]
    })
}

/// Built-in tasks for runs without a dataset.
pub fn demo_challenges() -> ChallengeSet {
    // Literal above is a valid challenge set; a parse failure is unreachable
    serde_json::from_value(demo_challenges_json()).unwrap_or_default()
}

pub fn demo_solutions() -> SolutionSet {
    serde_json::from_value(demo_solutions_json()).unwrap_or_default()
}

/// Serialize `value` to `path`, creating parent directories.
pub async fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), DatasetError> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|source| DatasetError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| DatasetError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, encoded)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub async fn write_submission(
    path: &Path,
    submission: &Submission,
    pretty: bool,
) -> Result<(), DatasetError> {
    write_json(path, submission, pretty).await?;
    info!(path = %path.display(), tasks = submission.len(), "Wrote submission");
    Ok(())
}

/// Reports are always pretty-printed; they are read by people.
pub async fn write_report<R: Serialize>(path: &Path, report: &R) -> Result<(), DatasetError> {
    write_json(path, report, true).await?;
    info!(path = %path.display(), "Wrote run report");
    Ok(())
}

/// Path of the report written next to `submission_path`.
pub fn default_report_path(submission_path: &Path) -> PathBuf {
    let stem = submission_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "submission".to_string());
    submission_path.with_file_name(format!("{stem}.report.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_data_is_consistent() {
        let challenges = demo_challenges();
        let solutions = demo_solutions();
        assert_eq!(challenges.len(), 3);
        assert_eq!(solutions.len(), 3);
        for (id, task) in challenges.iter() {
            assert_eq!(solutions.get(id).unwrap().len(), task.test.len());
        }
    }

    #[test]
    fn test_in_memory_repository() {
        let repo = InMemoryChallengeRepository::demo();
        let challenges = tokio_test::block_on(repo.load_challenges()).unwrap();
        assert_eq!(challenges.test_case_count(), 3);
        let solutions = tokio_test::block_on(repo.load_solutions()).unwrap();
        assert_eq!(solutions, Some(demo_solutions()));

        let empty = InMemoryChallengeRepository::default();
        assert_eq!(tokio_test::block_on(empty.load_solutions()).unwrap(), None);
        assert_eq!(empty.describe(), "in-memory (0 tasks)");
    }

    #[test]
    fn test_discovery_order_and_hyphen_variant() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("arc-agi_training_challenges.json"), "{}").unwrap();
        std::fs::write(dir.path().join("arc-agi_evaluation-challenges.json"), "{}").unwrap();
        std::fs::write(dir.path().join("arc-agi_evaluation_solutions.json"), "{}").unwrap();

        let files = discover(dir.path()).unwrap();
        assert_eq!(files.challenges, dir.path().join("arc-agi_evaluation-challenges.json"));
        assert_eq!(
            files.solutions,
            Some(dir.path().join("arc-agi_evaluation_solutions.json"))
        );

        std::fs::write(dir.path().join("arc-agi_test_challenges.json"), "{}").unwrap();
        let files = discover(dir.path()).unwrap();
        assert_eq!(files.challenges, dir.path().join("arc-agi_test_challenges.json"));
        assert_eq!(files.solutions, None);
    }

    #[test]
    fn test_discovery_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(discover(dir.path()), Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn test_default_report_path() {
        assert_eq!(
            default_report_path(Path::new("out/submission.json")),
            PathBuf::from("out/submission.report.json")
        );
    }
}
