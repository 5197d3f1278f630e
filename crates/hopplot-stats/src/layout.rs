//! Dot stacking for quantile dotplots
//!
//! Turns a dot set into columns of stacked dots. Columns are formed greedily
//! from left to right: a column starts at its first dot and takes every
//! following dot that lies within one binwidth of it. The column is drawn at
//! the midpoint between its first and last member.

use serde::{Deserialize, Serialize};

use crate::dotplot::DotSet;
use crate::error::{StatsError, StatsResult};

/// Bisection steps used by [`DotLayout::auto_binwidth`]
const BINWIDTH_SEARCH_STEPS: usize = 60;

/// Where a single dot is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotPosition {
    /// The dot's value in the dot set
    pub value: f64,
    /// Horizontal centre of the dot's column
    pub x: f64,
    /// Zero-based height of the dot within its column
    pub stack: usize,
}

/// A single column of stacked dots
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DotColumn {
    pub x: f64,
    pub count: usize,
}

/// Stacked layout of a dot set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotLayout {
    binwidth: f64,
    positions: Vec<DotPosition>,
    columns: Vec<DotColumn>,
}

impl DotLayout {
    /// Stack `dots` into columns of width `binwidth`
    pub fn stack(dots: &DotSet, binwidth: f64) -> StatsResult<Self> {
        if !binwidth.is_finite() || binwidth <= 0.0 {
            return Err(StatsError::invalid(format!(
                "binwidth must be positive and finite, got {binwidth}"
            )));
        }

        let values = dots.values();
        let mut positions = Vec::with_capacity(values.len());
        let mut columns = Vec::new();

        let mut start = 0;
        while start < values.len() {
            let first = values[start];
            let end = start + values[start..].partition_point(|&v| v - first < binwidth);
            let x = (first + values[end - 1]) / 2.0;

            positions.extend(
                values[start..end]
                    .iter()
                    .enumerate()
                    .map(|(stack, &value)| DotPosition { value, x, stack }),
            );
            columns.push(DotColumn {
                x,
                count: end - start,
            });
            start = end;
        }

        Ok(Self {
            binwidth,
            positions,
            columns,
        })
    }

    /// Largest binwidth whose tallest column holds at most `max_stack` dots
    ///
    /// Fails if more than `max_stack` dots share a single value, since no
    /// binwidth can split them.
    pub fn auto_binwidth(dots: &DotSet, max_stack: usize) -> StatsResult<f64> {
        if max_stack == 0 {
            return Err(StatsError::invalid("max_stack must be at least 1"));
        }

        let values = dots.values();
        if values.is_empty() {
            return Err(StatsError::invalid("dot set is empty"));
        }
        let tallest_tie = tallest_run(values);
        if tallest_tie > max_stack {
            return Err(StatsError::invalid(format!(
                "{tallest_tie} dots share one value, more than max_stack = {max_stack}"
            )));
        }

        let range = values[values.len() - 1] - values[0];
        let Some(min_gap) = smallest_gap(values) else {
            // Every dot has the same value and they fit in one column
            return Ok(1.0);
        };

        let fits = |binwidth: f64| tallest_column(values, binwidth) <= max_stack;
        if fits(range) {
            return Ok(range);
        }

        // min_gap always fits: no column can span two distinct values
        let (mut lo, mut hi) = (min_gap, range);
        for _ in 0..BINWIDTH_SEARCH_STEPS {
            let mid = (lo + hi) / 2.0;
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        tracing::debug!(binwidth = lo, max_stack, "chose dot binwidth");
        Ok(lo)
    }

    /// Binwidth the layout was built with
    pub fn binwidth(&self) -> f64 {
        self.binwidth
    }

    /// One position per dot, in dot-set order
    pub fn positions(&self) -> &[DotPosition] {
        &self.positions
    }

    /// Columns from left to right
    pub fn columns(&self) -> &[DotColumn] {
        &self.columns
    }

    /// Height of the tallest column
    pub fn max_stack(&self) -> usize {
        self.columns.iter().map(|c| c.count).max().unwrap_or(0)
    }
}

fn tallest_column(values: &[f64], binwidth: f64) -> usize {
    let mut tallest = 0;
    let mut start = 0;
    while start < values.len() {
        let first = values[start];
        let len = values[start..].partition_point(|&v| v - first < binwidth);
        tallest = tallest.max(len);
        start += len;
    }
    tallest
}

fn tallest_run(values: &[f64]) -> usize {
    values
        .chunk_by(|a, b| a == b)
        .map(|run| run.len())
        .max()
        .unwrap_or(0)
}

fn smallest_gap(values: &[f64]) -> Option<f64> {
    values
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&gap| gap > 0.0)
        .min_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dotplot::QuantileDotplotBuilder;
    use crate::sample::Sample;

    fn dots(values: Vec<f64>, n: i64) -> DotSet {
        let sample = Sample::from_values(values).unwrap();
        QuantileDotplotBuilder::new()
            .build_from_samples(&sample, n)
            .unwrap()
    }

    #[test]
    fn test_stack_groups_close_dots() {
        // Dots land near 0.04, 0.11, 0.19 and 3.2
        let set = dots(vec![0.0, 0.1, 0.2, 5.0], 4);
        let layout = DotLayout::stack(&set, 1.0).unwrap();

        assert_eq!(layout.positions().len(), 4);
        assert_eq!(layout.columns().len(), 2);
        assert_eq!(layout.columns()[0].count, 3);
        assert_eq!(layout.columns()[1].count, 1);
        assert_eq!(layout.max_stack(), 3);

        let stacks: Vec<usize> = layout.positions().iter().map(|p| p.stack).collect();
        assert_eq!(stacks, vec![0, 1, 2, 0]);
        assert_eq!(layout.positions()[3].x, set.values()[3]);
    }

    #[test]
    fn test_every_dot_placed_once() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64 / 7.0).collect();
        let set = dots(values, 50);
        let layout = DotLayout::stack(&set, 0.8).unwrap();

        assert_eq!(layout.positions().len(), set.len());
        let total: usize = layout.columns().iter().map(|c| c.count).sum();
        assert_eq!(total, set.len());
        for (pos, &value) in layout.positions().iter().zip(set.values()) {
            assert_eq!(pos.value, value);
        }
        assert!(layout.columns().windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_stack_rejects_bad_binwidth() {
        let set = dots(vec![1.0, 2.0], 2);
        assert!(DotLayout::stack(&set, 0.0).is_err());
        assert!(DotLayout::stack(&set, f64::NAN).is_err());
    }

    #[test]
    fn test_auto_binwidth_respects_max_stack() {
        let values: Vec<f64> = (0..=1000).map(|i| i as f64 / 100.0).collect();
        let set = dots(values, 40);
        let binwidth = DotLayout::auto_binwidth(&set, 5).unwrap();
        let layout = DotLayout::stack(&set, binwidth).unwrap();

        assert!(layout.max_stack() <= 5);
        assert!(binwidth > 0.0);
    }

    #[test]
    fn test_auto_binwidth_uses_full_range_when_it_fits() {
        let set = dots(vec![1.0, 2.0], 3);
        let binwidth = DotLayout::auto_binwidth(&set, 10).unwrap();
        let range = set.values()[2] - set.values()[0];
        assert!((binwidth - range).abs() < 1e-12);
    }

    #[test]
    fn test_auto_binwidth_rejects_tall_ties() {
        let set = dots(vec![3.0], 10);
        assert!(DotLayout::auto_binwidth(&set, 4).is_err());
        assert_eq!(DotLayout::auto_binwidth(&set, 10).unwrap(), 1.0);
        assert!(DotLayout::auto_binwidth(&set, 0).is_err());
    }
}
