// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Grid
//!
//! The ARC puzzle canvas: a rectangular 2-D array of colors `0..=9`.
//!
//! A [`Grid`] can only be built through validating constructors, so every
//! value of the type is non-empty, rectangular and in range. On the wire it is
//! a JSON list of lists of integers, exactly as the challenge and submission
//! files carry it.
//!
//! Geometric operations match numpy's `fliplr`, `flipud` and `rot90`, which is
//! how ARC transformations are usually described.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Cell color. Valid values are `0..=MAX_COLOR`.
pub type Color = u8;

/// Highest color the benchmark uses.
pub const MAX_COLOR: Color = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) holds {value}; colors must be 0-9")]
    ColorOutOfRange { row: usize, col: usize, value: i64 },
}

/// Rectangular color grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<Color>>")]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Color>,
}

impl Grid {
    /// Build a grid from rows, rejecting empty, ragged or out-of-range input.
    pub fn new(rows: Vec<Vec<Color>>) -> Result<Self, GridError> {
        Self::from_raw(
            rows.into_iter()
                .map(|row| row.into_iter().map(i64::from).collect())
                .collect(),
        )
    }

    /// Build a grid from untyped integers (as decoded from JSON).
    pub fn from_raw(rows: Vec<Vec<i64>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_idx, value) in row.into_iter().enumerate() {
                if !(0..=i64::from(MAX_COLOR)).contains(&value) {
                    return Err(GridError::ColorOutOfRange {
                        row: row_idx,
                        col: col_idx,
                        value,
                    });
                }
                cells.push(value as Color);
            }
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// A `height x width` grid of a single color.
    pub fn filled(height: usize, width: usize, color: Color) -> Result<Self, GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        if color > MAX_COLOR {
            return Err(GridError::ColorOutOfRange {
                row: 0,
                col: 0,
                value: i64::from(color),
            });
        }
        Ok(Self {
            height,
            width,
            cells: vec![color; height * width],
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row < self.height && col < self.width {
            Some(self.at(row, col))
        } else {
            None
        }
    }

    fn at(&self, row: usize, col: usize) -> Color {
        self.cells[row * self.width + col]
    }

    /// Row-major cell slice.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks(self.width)
    }

    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        self.rows().map(<[Color]>::to_vec).collect()
    }

    /// Number of non-zero ("set") cells.
    pub fn set_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Distinct colors present, ascending.
    pub fn colors(&self) -> BTreeSet<Color> {
        self.cells.iter().copied().collect()
    }

    /// True when every cell is 0 or 1.
    pub fn is_binary(&self) -> bool {
        self.cells.iter().all(|&c| c <= 1)
    }

    fn from_fn(height: usize, width: usize, f: impl Fn(usize, usize) -> Color) -> Self {
        let mut cells = Vec::with_capacity(height * width);
        for r in 0..height {
            for c in 0..width {
                cells.push(f(r, c));
            }
        }
        Self {
            height,
            width,
            cells,
        }
    }

    /// Mirror left-right (numpy `fliplr`).
    pub fn flip_horizontal(&self) -> Self {
        let w = self.width;
        Self::from_fn(self.height, w, |r, c| self.at(r, w - 1 - c))
    }

    /// Mirror top-bottom (numpy `flipud`).
    pub fn flip_vertical(&self) -> Self {
        let h = self.height;
        Self::from_fn(h, self.width, |r, c| self.at(h - 1 - r, c))
    }

    /// Rotate counter-clockwise by `quarter_turns * 90°` (numpy `rot90`).
    pub fn rotate(&self, quarter_turns: u8) -> Self {
        let mut out = self.clone();
        for _ in 0..(quarter_turns % 4) {
            out = out.rotate_once();
        }
        out
    }

    fn rotate_once(&self) -> Self {
        let w = self.width;
        Self::from_fn(w, self.height, |r, c| self.at(c, w - 1 - r))
    }

    /// Binary inversion `1 - x`, clipped into the color range: 0 becomes 1,
    /// everything else becomes 0.
    pub fn invert(&self) -> Self {
        Self {
            height: self.height,
            width: self.width,
            cells: self
                .cells
                .iter()
                .map(|&c| if c == 0 { 1 } else { 0 })
                .collect(),
        }
    }

    /// Paint the outer ring. Grids smaller than 2x2 have no ring and are
    /// returned unchanged.
    pub fn fill_border(&self, color: Color) -> Self {
        let (h, w) = self.shape();
        if h < 2 || w < 2 {
            return self.clone();
        }
        Self::from_fn(h, w, |r, c| {
            if r == 0 || r == h - 1 || c == 0 || c == w - 1 {
                color
            } else {
                self.at(r, c)
            }
        })
    }

    /// Nearest-index resample to `height x width`.
    pub fn rescale_nearest(&self, height: usize, width: usize) -> Result<Self, GridError> {
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        let (src_h, src_w) = self.shape();
        Ok(Self::from_fn(height, width, |r, c| {
            self.at(r * src_h / height, c * src_w / width)
        }))
    }

    /// Substitute colors cell by cell. Colors absent from `mapping` are kept.
    pub fn map_colors(&self, mapping: &BTreeMap<Color, Color>) -> Self {
        Self {
            height: self.height,
            width: self.width,
            cells: self
                .cells
                .iter()
                .map(|c| mapping.get(c).copied().unwrap_or(*c))
                .collect(),
        }
    }

    pub fn is_symmetric_horizontal(&self) -> bool {
        *self == self.flip_horizontal()
    }

    /// Complete left-right symmetry: where a cell and its mirror disagree the
    /// non-zero one wins, preferring the left cell when both are set.
    pub fn mirror_complete(&self) -> Self {
        let mut out = self.clone();
        let w = self.width;
        for r in 0..self.height {
            let row = &mut out.cells[r * w..(r + 1) * w];
            for c in 0..w / 2 {
                let (left, right) = (row[c], row[w - 1 - c]);
                if left == right {
                    continue;
                }
                if left > 0 {
                    row[w - 1 - c] = left;
                } else if right > 0 {
                    row[c] = right;
                }
            }
        }
        out
    }
}

impl TryFrom<Vec<Vec<i64>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_raw(rows)
    }
}

impl From<Grid> for Vec<Vec<Color>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", cell)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[Color]]) -> Grid {
        Grid::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_ragged() {
        assert_eq!(Grid::new(vec![]), Err(GridError::Empty));
        assert_eq!(Grid::new(vec![vec![]]), Err(GridError::Empty));
        assert_eq!(
            Grid::new(vec![vec![1, 2], vec![3]]),
            Err(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_rejects_out_of_range_colors() {
        let err = Grid::from_raw(vec![vec![0, 10]]).unwrap_err();
        assert_eq!(
            err,
            GridError::ColorOutOfRange {
                row: 0,
                col: 1,
                value: 10
            }
        );
        assert!(Grid::from_raw(vec![vec![-1]]).is_err());
    }

    #[test]
    fn test_json_shape() {
        let g: Grid = serde_json::from_str("[[0,1],[2,3]]").unwrap();
        assert_eq!(g.shape(), (2, 2));
        assert_eq!(serde_json::to_string(&g).unwrap(), "[[0,1],[2,3]]");
        assert!(serde_json::from_str::<Grid>("[[0,1],[2]]").is_err());
        assert!(serde_json::from_str::<Grid>("[[0,12]]").is_err());
    }

    #[test]
    fn test_flips() {
        let g = grid(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(g.flip_horizontal(), grid(&[&[3, 2, 1], &[6, 5, 4]]));
        assert_eq!(g.flip_vertical(), grid(&[&[4, 5, 6], &[1, 2, 3]]));
    }

    #[test]
    fn test_rotate_matches_numpy_rot90() {
        let g = grid(&[&[1, 2], &[3, 4]]);
        assert_eq!(g.rotate(1), grid(&[&[2, 4], &[1, 3]]));
        assert_eq!(g.rotate(2), grid(&[&[4, 3], &[2, 1]]));
        assert_eq!(g.rotate(3), grid(&[&[3, 1], &[4, 2]]));
        assert_eq!(g.rotate(4), g);

        let wide = grid(&[&[1, 2, 3]]);
        assert_eq!(wide.rotate(1), grid(&[&[3], &[2], &[1]]));
    }

    #[test]
    fn test_invert_clips() {
        let g = grid(&[&[0, 1, 5]]);
        assert_eq!(g.invert(), grid(&[&[1, 0, 0]]));
    }

    #[test]
    fn test_fill_border() {
        let g = Grid::filled(3, 3, 0).unwrap();
        assert_eq!(
            g.fill_border(1),
            grid(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]])
        );
        let thin = grid(&[&[0, 0, 0]]);
        assert_eq!(thin.fill_border(1), thin);
    }

    #[test]
    fn test_rescale_nearest() {
        let g = grid(&[&[1, 2], &[3, 4]]);
        assert_eq!(
            g.rescale_nearest(4, 4).unwrap(),
            grid(&[&[1, 1, 2, 2], &[1, 1, 2, 2], &[3, 3, 4, 4], &[3, 3, 4, 4]])
        );
        assert_eq!(g.rescale_nearest(1, 1).unwrap(), grid(&[&[1]]));
        assert_eq!(g.rescale_nearest(0, 3), Err(GridError::Empty));
    }

    #[test]
    fn test_mirror_complete() {
        let g = grid(&[&[3, 0, 0, 0], &[0, 0, 0, 7], &[2, 0, 0, 5]]);
        assert_eq!(
            g.mirror_complete(),
            grid(&[&[3, 0, 0, 3], &[7, 0, 0, 7], &[2, 0, 0, 2]])
        );
        assert!(g.mirror_complete().is_symmetric_horizontal());
    }

    #[test]
    fn test_counts_and_colors() {
        let g = grid(&[&[0, 3, 3], &[0, 0, 8]]);
        assert_eq!(g.set_cell_count(), 3);
        assert_eq!(g.colors().into_iter().collect::<Vec<_>>(), vec![0, 3, 8]);
        assert!(!g.is_binary());
        assert_eq!(g.to_string(), "0 3 3\n0 0 8");
    }
}
