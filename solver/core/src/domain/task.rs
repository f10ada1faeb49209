// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! ARC tasks and the challenge / solution file shapes.
//!
//! `arc-agi_*_challenges.json` maps task ids to `{"train": [...], "test": [...]}`;
//! `arc-agi_*_solutions.json` maps task ids to one expected grid per test case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::grid::Grid;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainPair {
    pub input: Grid,
    pub output: Grid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Grid,

    /// Present in some evaluation dumps; never in the hidden test set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Grid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub train: Vec<TrainPair>,
    pub test: Vec<TestCase>,
}

impl Task {
    pub fn primary_pair(&self) -> Option<&TrainPair> {
        self.train.first()
    }
}

/// Challenge file contents, ordered by task id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeSet {
    pub tasks: BTreeMap<TaskId, Task>,
}

impl ChallengeSet {
    pub fn new(tasks: BTreeMap<TaskId, Task>) -> Self {
        Self { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &Task)> {
        self.tasks.iter()
    }

    /// Keep only the first `n` tasks in id order.
    pub fn take(self, n: usize) -> Self {
        Self {
            tasks: self.tasks.into_iter().take(n).collect(),
        }
    }

    pub fn test_case_count(&self) -> usize {
        self.tasks.values().map(|t| t.test.len()).sum()
    }
}

impl IntoIterator for ChallengeSet {
    type Item = (TaskId, Task);
    type IntoIter = std::collections::btree_map::IntoIter<TaskId, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

/// Solution file contents: expected output per test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolutionSet {
    pub tasks: BTreeMap<TaskId, Vec<Grid>>,
}

impl SolutionSet {
    pub fn get(&self, id: &TaskId) -> Option<&[Grid]> {
        self.tasks.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Keep only the tasks present in `challenges`, e.g. after `--max-tasks`.
    pub fn restricted_to(&self, challenges: &ChallengeSet) -> Self {
        let tasks = self
            .tasks
            .iter()
            .filter(|(id, _)| challenges.get(id).is_some())
            .map(|(id, grids)| (id.clone(), grids.clone()))
            .collect();
        Self { tasks }
    }

    /// Collect solutions embedded in the challenge set's test cases. Tasks
    /// with any test case lacking an output are skipped.
    pub fn from_embedded(challenges: &ChallengeSet) -> Self {
        let tasks = challenges
            .iter()
            .filter_map(|(id, task)| {
                task.test
                    .iter()
                    .map(|case| case.output.clone())
                    .collect::<Option<Vec<_>>>()
                    .map(|grids| (id.clone(), grids))
            })
            .collect();
        Self { tasks }
    }
}
