// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Runs a solver strategy over a whole challenge set.
//!
//! Tasks are CPU-bound, so each one runs on tokio's blocking pool with at
//! most `workers` in flight. Results arrive out of order but land in the
//! id-ordered [`Submission`], so output is identical for any worker count.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::events::{RunId, SolveEvent};
use crate::domain::solver::{Prediction, SolverStrategy};
use crate::domain::submission::{Attempts, Submission};
use crate::domain::task::{ChallengeSet, Task, TaskId};
use crate::infrastructure::event_bus::EventBus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub tasks: usize,
    pub test_cases: usize,
    /// Test cases per transformation kind used for `attempt_1`
    pub transformations: BTreeMap<String, usize>,
    /// Test cases where the chosen transformation failed
    pub fallbacks: usize,
    pub elapsed_ms: u64,
    pub tasks_per_second: f64,
}

/// Run metadata, written next to the submission file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub solver: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    pub stats: RunStats,
}

#[derive(Debug, Clone)]
pub struct SolveRun {
    pub run_id: RunId,
    pub solver: String,
    pub submission: Submission,
    pub stats: RunStats,
}

impl SolveRun {
    pub fn report(&self, dataset: Option<String>) -> RunReport {
        RunReport {
            run_id: self.run_id,
            solver: self.solver.clone(),
            generated_at: Utc::now(),
            dataset,
            stats: self.stats.clone(),
        }
    }
}

struct TaskOutcome {
    task_id: TaskId,
    predictions: Vec<Prediction>,
    duration_ms: u64,
}

/// Predict every test case of `task`, in order.
pub fn solve_task(strategy: &dyn SolverStrategy, task: &Task) -> Vec<Prediction> {
    task.test
        .iter()
        .map(|case| strategy.solve(task, &case.input))
        .collect()
}

pub struct SolveService {
    strategy: Arc<dyn SolverStrategy>,
    event_bus: EventBus,
    workers: usize,
}

impl SolveService {
    pub fn new(strategy: Arc<dyn SolverStrategy>, event_bus: EventBus, workers: usize) -> Self {
        Self {
            strategy,
            event_bus,
            workers: workers.max(1),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn solve_all(&self, challenges: ChallengeSet) -> Result<SolveRun> {
        self.solve_all_with_id(RunId::new(), challenges).await
    }

    /// Like [`Self::solve_all`] with a caller-chosen id, so observers can
    /// [`EventBus::subscribe_run`] before the first event is published.
    pub async fn solve_all_with_id(
        &self,
        run_id: RunId,
        challenges: ChallengeSet,
    ) -> Result<SolveRun> {
        let started = Instant::now();
        let task_count = challenges.len();

        info!(%run_id, tasks = task_count, workers = self.workers, solver = self.strategy.name(), "Starting solve run");
        self.event_bus.publish(SolveEvent::RunStarted {
            run_id,
            task_count,
            started_at: Utc::now(),
        });

        let mut outcomes = stream::iter(challenges)
            .map(|(task_id, task)| {
                let strategy = Arc::clone(&self.strategy);
                async move {
                    let id = task_id.clone();
                    tokio::task::spawn_blocking(move || {
                        let t0 = Instant::now();
                        let predictions = solve_task(strategy.as_ref(), &task);
                        TaskOutcome {
                            task_id,
                            predictions,
                            duration_ms: t0.elapsed().as_millis() as u64,
                        }
                    })
                    .await
                    .with_context(|| format!("Solver worker for task {} failed", id))
                }
            })
            .buffer_unordered(self.workers);

        let mut submission = Submission::new();
        let mut stats = RunStats::default();

        while let Some(outcome) = outcomes.next().await {
            let outcome = outcome?;
            self.record(run_id, &outcome, &mut stats);
            let attempts = outcome
                .predictions
                .into_iter()
                .map(|p| Attempts {
                    attempt_1: p.attempt_1,
                    attempt_2: p.attempt_2,
                })
                .collect();
            submission.insert(outcome.task_id, attempts);
        }

        let elapsed = started.elapsed();
        stats.tasks = submission.len();
        stats.elapsed_ms = elapsed.as_millis() as u64;
        stats.tasks_per_second = if elapsed.as_secs_f64() > 0.0 {
            stats.tasks as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        info!(
            %run_id,
            tasks = stats.tasks,
            test_cases = stats.test_cases,
            fallbacks = stats.fallbacks,
            elapsed_ms = stats.elapsed_ms,
            "Solve run completed"
        );
        self.event_bus.publish(SolveEvent::RunCompleted {
            run_id,
            tasks: stats.tasks,
            duration_ms: stats.elapsed_ms,
            completed_at: Utc::now(),
        });

        Ok(SolveRun {
            run_id,
            solver: self.strategy.name().to_string(),
            submission,
            stats,
        })
    }

    fn record(&self, run_id: RunId, outcome: &TaskOutcome, stats: &mut RunStats) {
        stats.test_cases += outcome.predictions.len();
        for p in &outcome.predictions {
            *stats
                .transformations
                .entry(p.transformation.kind().to_string())
                .or_default() += 1;
        }

        let failure = outcome
            .predictions
            .iter()
            .find_map(|p| p.fallback_reason.clone());

        if let Some(reason) = failure {
            stats.fallbacks += outcome
                .predictions
                .iter()
                .filter(|p| p.fallback_reason.is_some())
                .count();
            warn!(task_id = %outcome.task_id, %reason, "Task fell back to identity");
            self.event_bus.publish(SolveEvent::TaskFallback {
                run_id,
                task_id: outcome.task_id.clone(),
                reason,
            });
            return;
        }

        let (transformation, confidence) = outcome
            .predictions
            .first()
            .map(|p| (p.transformation.kind().to_string(), p.confidence))
            .unwrap_or_else(|| ("none".to_string(), 0.0));

        debug!(task_id = %outcome.task_id, %transformation, confidence, "Task solved");
        self.event_bus.publish(SolveEvent::TaskSolved {
            run_id,
            task_id: outcome.task_id.clone(),
            test_cases: outcome.predictions.len(),
            transformation,
            confidence,
            duration_ms: outcome.duration_ms,
        });
    }
}
