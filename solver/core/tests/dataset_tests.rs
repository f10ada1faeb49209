// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use arcsmith_core::application::solve_service::SolveService;
use arcsmith_core::domain::solver::HeuristicSolver;
use arcsmith_core::domain::submission::{validate_submission, Submission};
use arcsmith_core::infrastructure::dataset::{
    demo_challenges, demo_solutions, write_report, write_submission, ChallengeRepository,
    DatasetError, FileChallengeRepository, InMemoryChallengeRepository,
};
use arcsmith_core::infrastructure::event_bus::EventBus;
use std::sync::Arc;

fn write_demo_split(dir: &std::path::Path, split: &str) {
    std::fs::write(
        dir.join(format!("arc-agi_{split}_challenges.json")),
        serde_json::to_string(&demo_challenges()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join(format!("arc-agi_{split}_solutions.json")),
        serde_json::to_string(&demo_solutions()).unwrap(),
    )
    .unwrap();
}

#[tokio::test]
async fn test_file_repository_loads_evaluation_split() {
    let dir = tempfile::tempdir().unwrap();
    write_demo_split(dir.path(), "evaluation");

    let repo = FileChallengeRepository::new(dir.path());
    let challenges = repo.load_challenges().await.unwrap();
    assert_eq!(challenges, demo_challenges());
    assert_eq!(repo.load_solutions().await.unwrap(), Some(demo_solutions()));
    assert!(repo.describe().ends_with("arc-agi_evaluation_challenges.json"));
}

#[tokio::test]
async fn test_test_split_has_no_solutions() {
    let dir = tempfile::tempdir().unwrap();
    write_demo_split(dir.path(), "training");
    std::fs::write(
        dir.path().join("arc-agi_test-challenges.json"),
        serde_json::to_string(&demo_challenges()).unwrap(),
    )
    .unwrap();

    let repo = FileChallengeRepository::new(dir.path());
    assert_eq!(repo.load_challenges().await.unwrap().len(), 3);
    assert_eq!(repo.load_solutions().await.unwrap(), None);
}

#[tokio::test]
async fn test_explicit_files_override_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    std::fs::write(&path, r#"{"only": {"train": [], "test": [{"input": [[1]]}]}}"#).unwrap();

    let repo = FileChallengeRepository::new("/nonexistent").with_files(Some(path), None);
    let challenges = repo.load_challenges().await.unwrap();
    assert_eq!(challenges.len(), 1);
}

#[tokio::test]
async fn test_parse_and_missing_errors() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileChallengeRepository::new(dir.path());
    assert!(matches!(repo.load_challenges().await, Err(DatasetError::NotFound(_))));

    std::fs::write(
        dir.path().join("arc-agi_test_challenges.json"),
        r#"{"bad": {"train": [], "test": [{"input": [[1, 12]]}]}}"#,
    )
    .unwrap();
    let err = repo.load_challenges().await.unwrap_err();
    assert!(matches!(err, DatasetError::Parse { .. }));
    assert!(err.to_string().contains("arc-agi_test_challenges.json"));
}

#[tokio::test]
async fn test_written_submission_round_trips_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let repo = InMemoryChallengeRepository::demo();
    let challenges = repo.load_challenges().await.unwrap();

    let service = SolveService::new(Arc::new(HeuristicSolver::default()), EventBus::default(), 2);
    let run = service.solve_all(challenges.clone()).await.unwrap();

    let submission_path = dir.path().join("out").join("submission.json");
    let report_path = dir.path().join("out").join("submission.report.json");
    write_submission(&submission_path, &run.submission, false).await.unwrap();
    write_report(&report_path, &run.report(Some(repo.describe()))).await.unwrap();

    let raw = std::fs::read_to_string(&submission_path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(document.get("_metadata").is_none());
    assert!(validate_submission(&document, &challenges).is_valid());

    let reloaded: Submission = serde_json::from_str(&raw).unwrap();
    assert_eq!(reloaded, run.submission);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["stats"]["tasks"], 3);
    assert_eq!(report["solver"], "heuristic");
}
