// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Heuristic Solver
//!
//! Picks a whole-grid transformation for a task and replays it on a test
//! input, producing the two attempts the ARC Prize format allows.
//!
//! ## Decision procedure
//!
//! 1. No training pairs: predict the test input unchanged.
//! 2. Every enabled detector inspects the **first** training pair.
//! 3. Each proposal is replayed over **all** training pairs; the fraction it
//!    reproduces exactly is its consistency. Candidates rank by
//!    `confidence * (0.5 + 0.5 * consistency)`, ties keeping detector order.
//! 4. Proposals below `min_confidence` are dropped.
//! 5. `attempt_1` is the best candidate. `attempt_2` is the next candidate
//!    that yields a different grid, or a copy of `attempt_1`.
//!
//! A transformation that fails to apply degrades to the identity prediction
//! and is reported through [`Prediction::fallback_reason`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::domain::grid::Grid;
use crate::domain::task::Task;
use crate::domain::transform::{default_detectors, TransformDetector, Transformation};

/// How the second attempt is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecondAttempt {
    /// Next-ranked candidate producing a different grid.
    #[default]
    RunnerUp,
    /// Always repeat the first attempt.
    Duplicate,
}

impl std::str::FromStr for SecondAttempt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "runner-up" | "runner_up" | "runnerup" => Ok(Self::RunnerUp),
            "duplicate" => Ok(Self::Duplicate),
            other => Err(format!(
                "unknown second attempt mode '{}', expected runner-up or duplicate",
                other
            )),
        }
    }
}

/// Output for a single test case.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub attempt_1: Grid,
    pub attempt_2: Grid,
    /// Transformation behind `attempt_1`
    pub transformation: Transformation,
    pub confidence: f64,
    pub consistency: f64,
    /// Set when the chosen transformation failed and identity was used instead
    pub fallback_reason: Option<String>,
}

impl Prediction {
    fn identity(test_input: &Grid, consistency: f64, fallback_reason: Option<String>) -> Self {
        Self {
            attempt_1: test_input.clone(),
            attempt_2: test_input.clone(),
            transformation: Transformation::Identity,
            confidence: 0.0,
            consistency,
            fallback_reason,
        }
    }
}

/// A ranked proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub detector: &'static str,
    pub transformation: Transformation,
    pub confidence: f64,
    pub consistency: f64,
}

impl Candidate {
    pub fn score(&self) -> f64 {
        self.confidence * (0.5 + 0.5 * self.consistency)
    }
}

pub trait SolverStrategy: Send + Sync {
    /// Label recorded in run reports.
    fn name(&self) -> &str;

    fn solve(&self, task: &Task, test_input: &Grid) -> Prediction;
}

pub struct HeuristicSolver {
    detectors: Vec<Box<dyn TransformDetector>>,
    min_confidence: f64,
    second_attempt: SecondAttempt,
}

impl HeuristicSolver {
    pub fn new(
        detectors: Vec<Box<dyn TransformDetector>>,
        min_confidence: f64,
        second_attempt: SecondAttempt,
    ) -> Self {
        Self {
            detectors,
            min_confidence,
            second_attempt,
        }
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Candidates for `task`, best first.
    pub fn rank(&self, task: &Task) -> Vec<Candidate> {
        let Some(pair) = task.primary_pair() else {
            return Vec::new();
        };

        let mut candidates: Vec<Candidate> = self
            .detectors
            .iter()
            .filter_map(|detector| {
                detector.detect(pair).map(|detection| Candidate {
                    detector: detector.name(),
                    consistency: detection.transformation.consistency(&task.train),
                    transformation: detection.transformation,
                    confidence: detection.confidence,
                })
            })
            .filter(|c| c.confidence >= self.min_confidence)
            .collect();

        candidates.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
        candidates
    }

    fn second_attempt(&self, candidates: &[Candidate], test_input: &Grid, first: &Grid) -> Grid {
        if self.second_attempt == SecondAttempt::Duplicate {
            return first.clone();
        }
        candidates
            .iter()
            .skip(1)
            .filter_map(|c| c.transformation.apply(test_input).ok())
            .find(|grid| grid != first)
            .unwrap_or_else(|| first.clone())
    }
}

impl Default for HeuristicSolver {
    fn default() -> Self {
        Self::new(default_detectors(), 0.0, SecondAttempt::default())
    }
}

impl SolverStrategy for HeuristicSolver {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn solve(&self, task: &Task, test_input: &Grid) -> Prediction {
        let candidates = self.rank(task);
        let Some(best) = candidates.first() else {
            let consistency = Transformation::Identity.consistency(&task.train);
            return Prediction::identity(test_input, consistency, None);
        };

        let attempt_1 = match best.transformation.apply(test_input) {
            Ok(grid) => grid,
            Err(e) => {
                warn!(
                    transformation = best.transformation.kind(),
                    error = %e,
                    "Transformation failed on test input, falling back to identity"
                );
                let mut prediction = Prediction::identity(
                    test_input,
                    Transformation::Identity.consistency(&task.train),
                    Some(e.to_string()),
                );
                prediction.attempt_2 =
                    self.second_attempt(&candidates, test_input, &prediction.attempt_1);
                return prediction;
            }
        };

        let attempt_2 = self.second_attempt(&candidates, test_input, &attempt_1);

        debug!(
            transformation = best.transformation.kind(),
            confidence = best.confidence,
            consistency = best.consistency,
            candidates = candidates.len(),
            "Selected transformation"
        );

        Prediction {
            attempt_1,
            attempt_2,
            transformation: best.transformation.clone(),
            confidence: best.confidence,
            consistency: best.consistency,
            fallback_reason: None,
        }
    }
}
