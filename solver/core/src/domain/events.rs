// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Progress of a solve run, published on the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SolveEvent {
    RunStarted {
        run_id: RunId,
        task_count: usize,
        started_at: DateTime<Utc>,
    },
    TaskSolved {
        run_id: RunId,
        task_id: TaskId,
        test_cases: usize,
        /// Transformation used for the first test case
        transformation: String,
        confidence: f64,
        duration_ms: u64,
    },
    TaskFallback {
        run_id: RunId,
        task_id: TaskId,
        reason: String,
    },
    RunCompleted {
        run_id: RunId,
        tasks: usize,
        duration_ms: u64,
        completed_at: DateTime<Utc>,
    },
}

impl SolveEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::TaskSolved { run_id, .. }
            | Self::TaskFallback { run_id, .. }
            | Self::RunCompleted { run_id, .. } => *run_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let run_id = RunId::new();
        let event = SolveEvent::TaskFallback {
            run_id,
            task_id: TaskId::new("abc"),
            reason: "zero rows".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "task_fallback");
        assert_eq!(json["task_id"], "abc");
        assert_eq!(event.run_id(), run_id);
    }
}
