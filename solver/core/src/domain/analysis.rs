// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Challenge complexity profiling.
//!
//! Measures each task's training pairs (largest grid, distinct colors,
//! share of non-zero cells) and buckets the task into a difficulty category.
//! Used by `arcsmith analyze` to describe a dataset before solving it.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::task::{ChallengeSet, Task, TaskId};

pub const LARGE_GRID_CELLS: usize = 400;
pub const MANY_COLORS: usize = 8;
pub const SPARSE_DENSITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskComplexity {
    /// Largest cell count among training grids
    pub grid_size: usize,
    /// Distinct colors across all training grids
    pub color_count: usize,
    /// Non-zero cells / total cells across all training grids
    pub pattern_density: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyCategory {
    Tractable,
    LargeGrid,
    ColorHeavy,
    SparsePattern,
}

impl DifficultyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tractable => "tractable",
            Self::LargeGrid => "large_grid",
            Self::ColorHeavy => "color_heavy",
            Self::SparsePattern => "sparse_pattern",
        }
    }
}

impl TaskComplexity {
    pub fn measure(task: &Task) -> Self {
        let mut grid_size = 0;
        let mut colors = BTreeSet::new();
        let mut set_cells = 0;
        let mut total_cells = 0;

        for grid in task.train.iter().flat_map(|p| [&p.input, &p.output]) {
            grid_size = grid_size.max(grid.cell_count());
            colors.extend(grid.colors());
            set_cells += grid.set_cell_count();
            total_cells += grid.cell_count();
        }

        Self {
            grid_size,
            color_count: colors.len(),
            pattern_density: if total_cells == 0 {
                0.0
            } else {
                set_cells as f64 / total_cells as f64
            },
        }
    }

    /// First matching category wins: large grid, then color heavy, then sparse.
    pub fn category(&self) -> DifficultyCategory {
        if self.grid_size > LARGE_GRID_CELLS {
            DifficultyCategory::LargeGrid
        } else if self.color_count > MANY_COLORS {
            DifficultyCategory::ColorHeavy
        } else if self.pattern_density < SPARSE_DENSITY {
            DifficultyCategory::SparsePattern
        } else {
            DifficultyCategory::Tractable
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplexitySummary {
    pub tasks: usize,
    pub by_category: BTreeMap<DifficultyCategory, usize>,
    pub avg_grid_size: f64,
    pub avg_color_count: f64,
    pub avg_pattern_density: f64,
    pub largest: Option<(TaskId, usize)>,
}

impl ComplexitySummary {
    pub fn from_challenges(challenges: &ChallengeSet) -> Self {
        let mut summary = Self::default();
        if challenges.is_empty() {
            return summary;
        }

        let (mut size_sum, mut color_sum, mut density_sum) = (0usize, 0usize, 0.0);
        for (id, task) in challenges.iter() {
            let c = TaskComplexity::measure(task);
            *summary.by_category.entry(c.category()).or_default() += 1;
            size_sum += c.grid_size;
            color_sum += c.color_count;
            density_sum += c.pattern_density;
            if summary.largest.as_ref().map_or(true, |(_, s)| c.grid_size > *s) {
                summary.largest = Some((id.clone(), c.grid_size));
            }
        }

        let n = challenges.len() as f64;
        summary.tasks = challenges.len();
        summary.avg_grid_size = size_sum as f64 / n;
        summary.avg_color_count = color_sum as f64 / n;
        summary.avg_pattern_density = density_sum / n;
        summary
    }
}
