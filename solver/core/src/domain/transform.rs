// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Grid Transformations and Detectors
//!
//! A [`Transformation`] is a whole-grid rewrite learned from one training
//! pair and replayed on a test input. A [`TransformDetector`] inspects a
//! training pair and, if the pair fits its pattern, proposes a transformation
//! with a fixed prior confidence.
//!
//! | Detector | Pattern | Confidence |
//! |----------|---------|------------|
//! | `reflection` | output is the input mirrored left-right or top-bottom | 0.95 |
//! | `inversion` | binary input, output is `1 - input` | 0.92 |
//! | `rotation` | output is the input rotated by 90°, 180° or 270° | 0.90 |
//! | `color_map` | consistent per-cell color substitution | 0.85 |
//! | `border_fill` | same shape, output has more set cells | 0.75 |
//! | `symmetry` | output left-right symmetric, input not | 0.65 |
//! | `rescale` | shapes differ | 0.60 |
//!
//! When nothing fires the solver falls back to [`Transformation::Identity`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::grid::{Color, Grid, GridError};
use crate::domain::task::TrainPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Left-right mirror (numpy `fliplr`)
    Horizontal,
    /// Top-bottom mirror (numpy `flipud`)
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transformation {
    Identity,
    Inversion,
    Reflection { axis: Axis },
    Rotation { quarter_turns: u8 },
    BorderFill { color: Color },
    Rescale { height: Ratio, width: Ratio },
    ColorMap { mapping: BTreeMap<Color, Color> },
    SymmetryCompletion,
}

/// Exact scale factor `to / from`, kept as integers so replaying a detected
/// rescale on its own training input reproduces the training shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub to: usize,
    pub from: usize,
}

impl Ratio {
    pub fn new(to: usize, from: usize) -> Self {
        Self { to, from }
    }

    /// `len * to / from`, truncated.
    pub fn scale(&self, len: usize) -> usize {
        if self.from == 0 {
            0
        } else {
            len * self.to / self.from
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.to, self.from)
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("rescale of {from_height}x{from_width} by ({height}, {width}) leaves no cells")]
    DegenerateShape {
        from_height: usize,
        from_width: usize,
        height: Ratio,
        width: Ratio,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl Transformation {
    pub fn apply(&self, grid: &Grid) -> Result<Grid, TransformError> {
        let out = match self {
            Self::Identity => grid.clone(),
            Self::Inversion => grid.invert(),
            Self::Reflection { axis: Axis::Horizontal } => grid.flip_horizontal(),
            Self::Reflection { axis: Axis::Vertical } => grid.flip_vertical(),
            Self::Rotation { quarter_turns } => grid.rotate(*quarter_turns),
            Self::BorderFill { color } => grid.fill_border(*color),
            Self::ColorMap { mapping } => grid.map_colors(mapping),
            Self::SymmetryCompletion => grid.mirror_complete(),
            Self::Rescale { height, width } => {
                let (h, w) = (height.scale(grid.height()), width.scale(grid.width()));
                if h == 0 || w == 0 {
                    return Err(TransformError::DegenerateShape {
                        from_height: grid.height(),
                        from_width: grid.width(),
                        height: *height,
                        width: *width,
                    });
                }
                grid.rescale_nearest(h, w)?
            }
        };
        Ok(out)
    }

    /// Stable snake_case label used in stats, events and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Inversion => "inversion",
            Self::Reflection { .. } => "reflection",
            Self::Rotation { .. } => "rotation",
            Self::BorderFill { .. } => "border_fill",
            Self::Rescale { .. } => "rescale",
            Self::ColorMap { .. } => "color_map",
            Self::SymmetryCompletion => "symmetry",
        }
    }

    /// Fraction of `pairs` this transformation reproduces exactly. An empty
    /// slice counts as fully consistent.
    pub fn consistency(&self, pairs: &[TrainPair]) -> f64 {
        if pairs.is_empty() {
            return 1.0;
        }
        let hits = pairs
            .iter()
            .filter(|pair| matches!(self.apply(&pair.input), Ok(out) if out == pair.output))
            .count();
        hits as f64 / pairs.len() as f64
    }
}

/// A transformation proposed by a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub transformation: Transformation,
    pub confidence: f64,
}

impl Detection {
    fn new(transformation: Transformation, confidence: f64) -> Self {
        Self {
            transformation,
            confidence,
        }
    }
}

pub trait TransformDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, pair: &TrainPair) -> Option<Detection>;
}

fn same_shape(pair: &TrainPair) -> bool {
    pair.input.shape() == pair.output.shape()
}

pub struct ReflectionDetector;

impl TransformDetector for ReflectionDetector {
    fn name(&self) -> &'static str {
        "reflection"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        if !same_shape(pair) {
            return None;
        }
        let axis = if pair.output == pair.input.flip_horizontal() {
            Axis::Horizontal
        } else if pair.output == pair.input.flip_vertical() {
            Axis::Vertical
        } else {
            return None;
        };
        Some(Detection::new(Transformation::Reflection { axis }, 0.95))
    }
}

pub struct InversionDetector;

impl TransformDetector for InversionDetector {
    fn name(&self) -> &'static str {
        "inversion"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        if same_shape(pair) && pair.input.is_binary() && pair.output == pair.input.invert() {
            Some(Detection::new(Transformation::Inversion, 0.92))
        } else {
            None
        }
    }
}

pub struct RotationDetector;

impl TransformDetector for RotationDetector {
    fn name(&self) -> &'static str {
        "rotation"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        (1..=3u8)
            .find(|&k| pair.input.rotate(k) == pair.output)
            .map(|quarter_turns| Detection::new(Transformation::Rotation { quarter_turns }, 0.90))
    }
}

pub struct ColorMapDetector;

impl TransformDetector for ColorMapDetector {
    fn name(&self) -> &'static str {
        "color_map"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        if !same_shape(pair) {
            return None;
        }
        let mut mapping: BTreeMap<Color, Color> = BTreeMap::new();
        for (&from, &to) in pair.input.cells().iter().zip(pair.output.cells()) {
            match mapping.get(&from) {
                Some(&existing) if existing != to => return None,
                Some(_) => {}
                None => {
                    mapping.insert(from, to);
                }
            }
        }
        mapping.retain(|from, to| from != to);
        if mapping.is_empty() {
            return None;
        }
        Some(Detection::new(Transformation::ColorMap { mapping }, 0.85))
    }
}

pub struct BorderFillDetector;

impl TransformDetector for BorderFillDetector {
    fn name(&self) -> &'static str {
        "border_fill"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        if same_shape(pair) && pair.output.set_cell_count() > pair.input.set_cell_count() {
            Some(Detection::new(Transformation::BorderFill { color: 1 }, 0.75))
        } else {
            None
        }
    }
}

pub struct SymmetryDetector;

impl TransformDetector for SymmetryDetector {
    fn name(&self) -> &'static str {
        "symmetry"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        if same_shape(pair)
            && pair.output.is_symmetric_horizontal()
            && !pair.input.is_symmetric_horizontal()
        {
            Some(Detection::new(Transformation::SymmetryCompletion, 0.65))
        } else {
            None
        }
    }
}

pub struct RescaleDetector;

impl TransformDetector for RescaleDetector {
    fn name(&self) -> &'static str {
        "rescale"
    }

    fn detect(&self, pair: &TrainPair) -> Option<Detection> {
        if same_shape(pair) {
            return None;
        }
        Some(Detection::new(
            Transformation::Rescale {
                height: Ratio::new(pair.output.height(), pair.input.height()),
                width: Ratio::new(pair.output.width(), pair.input.width()),
            },
            0.60,
        ))
    }
}

/// Every detector name, in evaluation order.
pub const DETECTOR_NAMES: [&str; 7] = [
    "reflection",
    "inversion",
    "rotation",
    "color_map",
    "border_fill",
    "symmetry",
    "rescale",
];

pub fn detector_by_name(name: &str) -> Option<Box<dyn TransformDetector>> {
    let detector: Box<dyn TransformDetector> = match name {
        "reflection" => Box::new(ReflectionDetector),
        "inversion" => Box::new(InversionDetector),
        "rotation" => Box::new(RotationDetector),
        "color_map" => Box::new(ColorMapDetector),
        "border_fill" => Box::new(BorderFillDetector),
        "symmetry" => Box::new(SymmetryDetector),
        "rescale" => Box::new(RescaleDetector),
        _ => return None,
    };
    Some(detector)
}

pub fn default_detectors() -> Vec<Box<dyn TransformDetector>> {
    DETECTOR_NAMES
        .iter()
        .filter_map(|name| detector_by_name(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[Color]]) -> Grid {
        Grid::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn pair(input: &[&[Color]], output: &[&[Color]]) -> TrainPair {
        TrainPair {
            input: grid(input),
            output: grid(output),
        }
    }

    #[test]
    fn test_inversion_requires_binary_input() {
        let p = pair(&[&[0, 1], &[1, 0]], &[&[1, 0], &[0, 1]]);
        let d = InversionDetector.detect(&p).unwrap();
        assert_eq!(d.transformation, Transformation::Inversion);

        let colored = pair(&[&[0, 2]], &[&[1, 0]]);
        assert!(InversionDetector.detect(&colored).is_none());
    }

    #[test]
    fn test_reflection_axis() {
        let h = pair(&[&[1, 2, 3]], &[&[3, 2, 1]]);
        assert_eq!(
            ReflectionDetector.detect(&h).unwrap().transformation,
            Transformation::Reflection {
                axis: Axis::Horizontal
            }
        );
        let v = pair(&[&[1], &[2]], &[&[2], &[1]]);
        assert_eq!(
            ReflectionDetector.detect(&v).unwrap().transformation,
            Transformation::Reflection {
                axis: Axis::Vertical
            }
        );
    }

    #[test]
    fn test_rotation_allows_transposed_shape() {
        let p = pair(&[&[1, 2, 3]], &[&[3], &[2], &[1]]);
        assert_eq!(
            RotationDetector.detect(&p).unwrap().transformation,
            Transformation::Rotation { quarter_turns: 1 }
        );
    }

    #[test]
    fn test_color_map_rejects_conflicts() {
        let ok = pair(&[&[1, 2, 0]], &[&[3, 4, 0]]);
        let d = ColorMapDetector.detect(&ok).unwrap();
        let Transformation::ColorMap { mapping } = d.transformation else {
            panic!("expected color map");
        };
        assert_eq!(mapping.get(&1), Some(&3));
        assert_eq!(mapping.get(&0), None);

        let conflict = pair(&[&[1, 1]], &[&[3, 4]]);
        assert!(ColorMapDetector.detect(&conflict).is_none());

        let unchanged = pair(&[&[1, 2]], &[&[1, 2]]);
        assert!(ColorMapDetector.detect(&unchanged).is_none());
    }

    #[test]
    fn test_border_fill_counts_set_cells() {
        let p = pair(&[&[0, 0], &[0, 0]], &[&[1, 1], &[1, 1]]);
        assert!(BorderFillDetector.detect(&p).is_some());
        let fewer = pair(&[&[1, 1]], &[&[0, 1]]);
        assert!(BorderFillDetector.detect(&fewer).is_none());
    }

    #[test]
    fn test_rescale_ratio_and_apply() {
        let p = pair(&[&[1, 0, 1]], &[&[0, 1, 0], &[1, 0, 1], &[0, 1, 0]]);
        let d = RescaleDetector.detect(&p).unwrap();
        assert_eq!(
            d.transformation,
            Transformation::Rescale {
                height: Ratio::new(3, 1),
                width: Ratio::new(3, 3),
            }
        );
        let out = d.transformation.apply(&grid(&[&[1, 1]])).unwrap();
        assert_eq!(out, grid(&[&[1, 1], &[1, 1], &[1, 1]]));
    }

    #[test]
    fn test_rescale_replays_its_own_pair() {
        // 15/11 is not exact in floating point; 11 * 1.3636.. truncates to 14
        for (from, to) in [(11u8, 15u8), (13, 15), (23, 26), (25, 29), (11, 30)] {
            let input = Grid::filled(from as usize, 1, 1).unwrap();
            let output = Grid::filled(to as usize, 1, 1).unwrap();
            let p = TrainPair { input: input.clone(), output: output.clone() };
            let t = RescaleDetector.detect(&p).unwrap().transformation;
            assert_eq!(t.apply(&input).unwrap().shape(), (to as usize, 1));
            assert_eq!(t.consistency(std::slice::from_ref(&p)), 1.0);
        }
    }

    #[test]
    fn test_rescale_to_nothing_is_an_error() {
        let t = Transformation::Rescale {
            height: Ratio::new(1, 5),
            width: Ratio::new(1, 1),
        };
        assert!(matches!(
            t.apply(&grid(&[&[1], &[2]])),
            Err(TransformError::DegenerateShape { .. })
        ));
    }

    #[test]
    fn test_consistency_over_pairs() {
        let pairs = vec![
            pair(&[&[0, 1]], &[&[1, 0]]),
            pair(&[&[1, 1]], &[&[0, 0]]),
            pair(&[&[1, 1]], &[&[1, 1]]),
        ];
        let c = Transformation::Inversion.consistency(&pairs);
        assert!((c - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(Transformation::Identity.consistency(&[]), 1.0);
    }

    #[test]
    fn test_detector_registry() {
        assert_eq!(default_detectors().len(), DETECTOR_NAMES.len());
        for name in DETECTOR_NAMES {
            assert_eq!(detector_by_name(name).unwrap().name(), name);
        }
        assert!(detector_by_name("telepathy").is_none());
    }
}
