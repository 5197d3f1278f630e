//! Summary statistics for dot sets and samples
//!
//! Provides the numbers that usually accompany a dotplot in a report:
//! - Mean, standard deviation
//! - Min, max, median
//! - Central intervals (e.g. the 80% interval a reader can count off in dots)

use serde::{Deserialize, Serialize};

use crate::dotplot::DotSet;
use crate::ecdf::linear_quantile_sorted;
use crate::error::{validation, StatsError, StatsResult};

/// Summary statistics for a numeric dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean (average)
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Median (50th percentile)
    pub median: f64,
}

/// A central interval `[lower, upper]` holding `level` of the probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        (self.lower..=self.upper).contains(&x)
    }
}

impl Summary {
    /// Compute summary statistics from data
    ///
    /// Fails on empty input or non-finite values.
    pub fn from_values(data: &[f64]) -> StatsResult<Self> {
        if data.is_empty() {
            return Err(StatsError::invalid("cannot summarise an empty dataset"));
        }
        validation::validate_finite(data, "values")?;

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);
        Ok(Self::from_sorted(&sorted))
    }

    /// Summary of a dot set's values
    pub fn from_dots(dots: &DotSet) -> StatsResult<Self> {
        if dots.is_empty() {
            return Err(StatsError::invalid("cannot summarise an empty dot set"));
        }
        Ok(Self::from_sorted(dots.values()))
    }

    fn from_sorted(sorted: &[f64]) -> Self {
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            std_dev: variance.sqrt(),
            median: linear_quantile_sorted(sorted, 0.5),
        }
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Central interval of a dot set at `level` (e.g. 0.8 for 80%)
///
/// Counts dots rather than interpolating: the interval spans the dots that
/// remain after dropping an equal share from each tail, which is what a
/// reader sees when counting dots on the chart.
pub fn central_interval(dots: &DotSet, level: f64) -> StatsResult<Interval> {
    if !(level > 0.0 && level <= 1.0) {
        return Err(StatsError::invalid(format!(
            "interval level must be in (0, 1], got {level}"
        )));
    }
    if dots.is_empty() {
        return Err(StatsError::invalid("dot set is empty"));
    }

    let values = dots.values();
    let n = values.len();
    // Tolerance keeps 1 - 0.8 from rounding a whole dot away
    let dropped = ((1.0 - level) * n as f64 / 2.0 + 1e-9).floor() as usize;
    let dropped = dropped.min((n - 1) / 2);

    Ok(Interval {
        level,
        lower: values[dropped],
        upper: values[n - 1 - dropped],
    })
}
