// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! ARC Prize scoring.
//!
//! A test case is solved when either attempt matches the expected grid
//! exactly. A task scores the fraction of its test cases solved, and the
//! overall score is the sum of task scores divided by the number of
//! ground-truth tasks. Tasks absent from the submission score zero.

use serde::Serialize;

use crate::domain::submission::{Attempts, Submission};
use crate::domain::task::{SolutionSet, TaskId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskScore {
    pub task_id: TaskId,
    pub test_cases: usize,
    pub solved: usize,
    /// Index of the attempt (1 or 2) that solved each test case, if any
    pub solved_by: Vec<Option<u8>>,
}

impl TaskScore {
    pub fn score(&self) -> f64 {
        if self.test_cases == 0 {
            0.0
        } else {
            self.solved as f64 / self.test_cases as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreReport {
    pub tasks: Vec<TaskScore>,
    pub total_score: f64,
    pub tasks_scored: usize,
    /// Submitted tasks with no ground truth available
    pub unscored: Vec<TaskId>,
    /// Ground-truth tasks the submission left out (scored as zero)
    pub missing: Vec<TaskId>,
}

impl ScoreReport {
    /// Mean task score in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        if self.tasks_scored == 0 {
            0.0
        } else {
            self.total_score / self.tasks_scored as f64
        }
    }

    pub fn fully_solved(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.test_cases > 0 && t.solved == t.test_cases)
            .count()
    }
}

pub fn score_submission(submission: &Submission, solutions: &SolutionSet) -> ScoreReport {
    let mut report = ScoreReport::default();

    for (task_id, expected) in &solutions.tasks {
        let attempts: &[Attempts] = match submission.get(task_id) {
            Some(attempts) => attempts,
            None => {
                report.missing.push(task_id.clone());
                &[]
            }
        };

        let solved_by: Vec<Option<u8>> = expected
            .iter()
            .enumerate()
            .map(|(i, truth)| {
                attempts.get(i).and_then(|a| {
                    if &a.attempt_1 == truth {
                        Some(1)
                    } else if &a.attempt_2 == truth {
                        Some(2)
                    } else {
                        None
                    }
                })
            })
            .collect();

        let task = TaskScore {
            task_id: task_id.clone(),
            test_cases: expected.len(),
            solved: solved_by.iter().filter(|s| s.is_some()).count(),
            solved_by,
        };
        report.total_score += task.score();
        report.tasks_scored += 1;
        report.tasks.push(task);
    }

    report.unscored = submission
        .tasks
        .keys()
        .filter(|id| solutions.get(id).is_none())
        .cloned()
        .collect();

    report
}
