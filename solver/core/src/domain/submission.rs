// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # ARC Prize Submission Format
//!
//! The competition expects a JSON object mapping every task id of the
//! challenge file to a list holding one `{"attempt_1": grid, "attempt_2": grid}`
//! object per test case, in test-case order.
//!
//! Validation runs on the raw [`serde_json::Value`] rather than on the typed
//! [`Submission`], so that a hand-edited or third-party file reports every
//! defect (extra keys, wrong types, bad colors) instead of failing on the
//! first deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::grid::{Grid, MAX_COLOR};
use crate::domain::task::{ChallengeSet, TaskId};

pub const ATTEMPT_KEYS: [&str; 2] = ["attempt_1", "attempt_2"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attempts {
    pub attempt_1: Grid,
    pub attempt_2: Grid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    pub tasks: BTreeMap<TaskId, Vec<Attempts>>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, task_id: TaskId, attempts: Vec<Attempts>) {
        self.tasks.insert(task_id, attempts);
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&[Attempts]> {
        self.tasks.get(task_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubmissionViolation {
    NotAnObject,
    MissingTask {
        task: String,
    },
    UnexpectedTask {
        task: String,
    },
    NotAList {
        task: String,
    },
    WrongPredictionCount {
        task: String,
        expected: usize,
        found: usize,
    },
    PredictionNotObject {
        task: String,
        index: usize,
    },
    MissingAttempt {
        task: String,
        index: usize,
        key: String,
    },
    UnexpectedKey {
        task: String,
        index: usize,
        key: String,
    },
    InvalidGrid {
        task: String,
        index: usize,
        key: String,
        reason: String,
    },
}

impl fmt::Display for SubmissionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "submission root must be a JSON object"),
            Self::MissingTask { task } => write!(f, "task {}: missing from submission", task),
            Self::UnexpectedTask { task } => {
                write!(f, "task {}: not present in the challenge file", task)
            }
            Self::NotAList { task } => write!(f, "task {}: predictions must be a list", task),
            Self::WrongPredictionCount {
                task,
                expected,
                found,
            } => write!(
                f,
                "task {}: expected {} prediction(s), found {}",
                task, expected, found
            ),
            Self::PredictionNotObject { task, index } => {
                write!(f, "task {}[{}]: prediction must be an object", task, index)
            }
            Self::MissingAttempt { task, index, key } => {
                write!(f, "task {}[{}]: missing '{}'", task, index, key)
            }
            Self::UnexpectedKey { task, index, key } => {
                write!(f, "task {}[{}]: unexpected key '{}'", task, index, key)
            }
            Self::InvalidGrid {
                task,
                index,
                key,
                reason,
            } => write!(f, "task {}[{}].{}: {}", task, index, key, reason),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubmissionReport {
    pub tasks_checked: usize,
    pub violations: Vec<SubmissionViolation>,
}

impl SubmissionReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check a raw submission document against the challenge file it answers.
pub fn validate_submission(document: &Value, challenges: &ChallengeSet) -> SubmissionReport {
    let mut report = SubmissionReport::default();

    let Some(root) = document.as_object() else {
        report.violations.push(SubmissionViolation::NotAnObject);
        return report;
    };

    for (task_id, task) in challenges.iter() {
        let task_key = task_id.as_str();
        let Some(predictions) = root.get(task_key) else {
            report.violations.push(SubmissionViolation::MissingTask {
                task: task_key.to_string(),
            });
            continue;
        };
        report.tasks_checked += 1;

        let Some(predictions) = predictions.as_array() else {
            report.violations.push(SubmissionViolation::NotAList {
                task: task_key.to_string(),
            });
            continue;
        };

        if predictions.len() != task.test.len() {
            report.violations.push(SubmissionViolation::WrongPredictionCount {
                task: task_key.to_string(),
                expected: task.test.len(),
                found: predictions.len(),
            });
        }

        for (index, prediction) in predictions.iter().enumerate() {
            check_prediction(task_key, index, prediction, &mut report.violations);
        }
    }

    for key in root.keys() {
        if challenges.get(&TaskId::new(key.as_str())).is_none() {
            report.violations.push(SubmissionViolation::UnexpectedTask { task: key.clone() });
        }
    }

    report
}

fn check_prediction(
    task: &str,
    index: usize,
    prediction: &Value,
    violations: &mut Vec<SubmissionViolation>,
) {
    let Some(object) = prediction.as_object() else {
        violations.push(SubmissionViolation::PredictionNotObject {
            task: task.to_string(),
            index,
        });
        return;
    };

    for key in ATTEMPT_KEYS {
        match object.get(key) {
            None => violations.push(SubmissionViolation::MissingAttempt {
                task: task.to_string(),
                index,
                key: key.to_string(),
            }),
            Some(grid) => {
                if let Err(reason) = check_grid(grid) {
                    violations.push(SubmissionViolation::InvalidGrid {
                        task: task.to_string(),
                        index,
                        key: key.to_string(),
                        reason,
                    });
                }
            }
        }
    }

    for key in object.keys() {
        if !ATTEMPT_KEYS.contains(&key.as_str()) {
            violations.push(SubmissionViolation::UnexpectedKey {
                task: task.to_string(),
                index,
                key: key.clone(),
            });
        }
    }
}

fn check_grid(value: &Value) -> Result<(), String> {
    let rows = value.as_array().ok_or("grid must be a list of rows")?;
    if rows.is_empty() {
        return Err("grid has no rows".to_string());
    }

    let mut width = None;
    for (r, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or_else(|| format!("row {} is not a list", r))?;
        if cells.is_empty() {
            return Err(format!("row {} is empty", r));
        }
        match width {
            None => width = Some(cells.len()),
            Some(w) if w != cells.len() => {
                return Err(format!("row {} has {} cells, expected {}", r, cells.len(), w));
            }
            Some(_) => {}
        }
        for (c, cell) in cells.iter().enumerate() {
            let value = cell
                .as_i64()
                .ok_or_else(|| format!("cell ({}, {}) is not an integer", r, c))?;
            if !(0..=i64::from(MAX_COLOR)).contains(&value) {
                return Err(format!("cell ({}, {}) holds {}; colors must be 0-9", r, c, value));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn challenges() -> ChallengeSet {
        serde_json::from_value(json!({
            "t1": {"train": [], "test": [{"input": [[0]]}]},
            "t2": {"train": [], "test": [{"input": [[0]]}, {"input": [[1]]}]}
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_submission() {
        let doc = json!({
            "t1": [{"attempt_1": [[1]], "attempt_2": [[0]]}],
            "t2": [
                {"attempt_1": [[1, 2]], "attempt_2": [[3, 4]]},
                {"attempt_1": [[9]], "attempt_2": [[0]]}
            ]
        });
        let report = validate_submission(&doc, &challenges());
        assert!(report.is_valid(), "{:?}", report.violations);
        assert_eq!(report.tasks_checked, 2);

        let typed: Submission = serde_json::from_value(doc).unwrap();
        assert_eq!(typed.get(&"t2".into()).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_and_unexpected_tasks() {
        let doc = json!({
            "t1": [{"attempt_1": [[1]], "attempt_2": [[1]]}],
            "_metadata": {"model": "x"}
        });
        let report = validate_submission(&doc, &challenges());
        assert!(report.violations.contains(&SubmissionViolation::MissingTask {
            task: "t2".to_string()
        }));
        assert!(report.violations.contains(&SubmissionViolation::UnexpectedTask {
            task: "_metadata".to_string()
        }));
    }

    #[test]
    fn test_prediction_count_and_keys() {
        let doc = json!({
            "t1": [{"attempt_1": [[1]], "attempt_3": [[1]]}],
            "t2": [{"attempt_1": [[1]], "attempt_2": [[1]]}]
        });
        let report = validate_submission(&doc, &challenges());
        assert_eq!(report.violations.len(), 3, "{:?}", report.violations);
        assert!(report.violations.contains(&SubmissionViolation::MissingAttempt {
            task: "t1".to_string(),
            index: 0,
            key: "attempt_2".to_string()
        }));
        assert!(report.violations.contains(&SubmissionViolation::UnexpectedKey {
            task: "t1".to_string(),
            index: 0,
            key: "attempt_3".to_string()
        }));
        assert!(report.violations.contains(&SubmissionViolation::WrongPredictionCount {
            task: "t2".to_string(),
            expected: 2,
            found: 1
        }));
    }

    #[test]
    fn test_grid_shape_violations() {
        for (bad, needle) in [
            (json!([[1, 10]]), "colors must be 0-9"),
            (json!([[1, -1]]), "colors must be 0-9"),
            (json!([[1, 2], [3]]), "expected 2"),
            (json!([[1.5]]), "not an integer"),
            (json!([]), "no rows"),
            (json!([[]]), "row 0 is empty"),
            (json!("grid"), "list of rows"),
        ] {
            let err = check_grid(&bad).unwrap_err();
            assert!(err.contains(needle), "{} -> {}", bad, err);
        }
    }

    #[test]
    fn test_non_object_root() {
        let report = validate_submission(&json!([1, 2]), &challenges());
        assert_eq!(report.violations, vec![SubmissionViolation::NotAnObject]);
    }

    #[test]
    fn test_pretty_and_compact_serialization() {
        let mut submission = Submission::new();
        let g = Grid::new(vec![vec![1]]).unwrap();
        submission.insert(
            "t1".into(),
            vec![Attempts {
                attempt_1: g.clone(),
                attempt_2: g,
            }],
        );
        assert_eq!(
            submission.to_json_string(false).unwrap(),
            r#"{"t1":[{"attempt_1":[[1]],"attempt_2":[[1]]}]}"#
        );
        assert!(submission.to_json_string(true).unwrap().contains('\n'));
    }
}
