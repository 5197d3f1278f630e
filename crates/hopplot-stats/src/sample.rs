//! Samples of draws from a distribution of interest
//!
//! A sample is either a plain sequence of draws (posterior predictive draws,
//! simulated outcomes) or a set of (value, weight) pairs, such as counts
//! read off a histogram. Values are kept sorted so repeated quantile queries
//! cost O(log n).
//!
//! Quantiles follow the type 7 rule for every form. A weighted sample is
//! read as if each value were repeated `weight / unit` times, where `unit`
//! is the weight of one draw: 1 for counts, and the smallest weight for
//! arbitrary weights. Equal weights therefore give the same quantiles as
//! the unweighted values, and counts give the same quantiles as the
//! expanded draws.

use serde::{Deserialize, Serialize};

use crate::ecdf::linear_quantile_sorted;
use crate::error::{validation, StatsError, StatsResult};

/// A validated, sorted sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampleRepr", into = "SampleRepr")]
pub struct Sample {
    /// Values sorted ascending
    values: Vec<f64>,
    weights: Option<Weights>,
}

/// Weights aligned with the sorted values
#[derive(Debug, Clone, PartialEq)]
struct Weights {
    weights: Vec<f64>,
    /// Running total of `weights`; the last entry is the total weight
    cumulative: Vec<f64>,
    /// Weight of a single draw, at most the smallest weight
    unit: f64,
}

/// Serialized form of a [`Sample`]; deserializing goes through the
/// validating constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SampleRepr {
    values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weights: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<f64>,
}

impl TryFrom<SampleRepr> for Sample {
    type Error = StatsError;

    fn try_from(repr: SampleRepr) -> StatsResult<Self> {
        match repr.weights {
            None if repr.unit.is_some() => {
                Err(StatsError::invalid("an unweighted sample has no unit weight"))
            }
            None => Self::from_values(repr.values),
            Some(weights) => {
                if weights.len() != repr.values.len() {
                    return Err(StatsError::invalid(format!(
                        "values and weights must have the same length ({} vs {})",
                        repr.values.len(),
                        weights.len()
                    )));
                }
                Self::weighted(repr.values.into_iter().zip(weights).collect(), repr.unit)
            }
        }
    }
}

impl From<Sample> for SampleRepr {
    fn from(sample: Sample) -> Self {
        let (weights, unit) = match sample.weights {
            Some(w) => (Some(w.weights), Some(w.unit)),
            None => (None, None),
        };
        Self {
            values: sample.values,
            weights,
            unit,
        }
    }
}

impl Sample {
    /// Build an unweighted sample
    ///
    /// Fails if `values` is empty or contains a non-finite value.
    pub fn from_values(values: Vec<f64>) -> StatsResult<Self> {
        if values.is_empty() {
            return Err(StatsError::invalid("sample must contain at least one value"));
        }
        validation::validate_finite(&values, "sample values")?;

        let mut values = values;
        values.sort_by(f64::total_cmp);

        Ok(Self {
            values,
            weights: None,
        })
    }

    /// Build a weighted sample from (value, weight) pairs
    ///
    /// Weights must be finite and non-negative with a positive total.
    /// Pairs with zero weight carry no probability and are dropped. Only
    /// relative weights matter: scaling every weight gives the same sample.
    pub fn from_weighted(pairs: Vec<(f64, f64)>) -> StatsResult<Self> {
        Self::weighted(pairs, None)
    }

    /// Build a weighted sample from values and integer counts
    ///
    /// Equivalent to repeating each value `count` times.
    pub fn from_counts(values: &[f64], counts: &[u64]) -> StatsResult<Self> {
        if values.len() != counts.len() {
            return Err(StatsError::invalid(format!(
                "values and counts must have the same length ({} vs {})",
                values.len(),
                counts.len()
            )));
        }
        let pairs = values
            .iter()
            .zip(counts)
            .map(|(&v, &c)| (v, c as f64))
            .collect();
        Self::weighted(pairs, Some(1.0))
    }

    /// `unit` defaults to the smallest positive weight
    fn weighted(pairs: Vec<(f64, f64)>, unit: Option<f64>) -> StatsResult<Self> {
        if pairs.is_empty() {
            return Err(StatsError::invalid("sample must contain at least one value"));
        }

        for (idx, &(value, weight)) in pairs.iter().enumerate() {
            if !value.is_finite() {
                return Err(StatsError::invalid(format!(
                    "sample values must be finite, found {value} at index {idx}"
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(StatsError::invalid(format!(
                    "weights must be finite and non-negative, found {weight} at index {idx}"
                )));
            }
        }

        let mut pairs: Vec<(f64, f64)> = pairs.into_iter().filter(|&(_, w)| w > 0.0).collect();
        if pairs.is_empty() {
            return Err(StatsError::invalid("total weight must be positive"));
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let smallest = pairs.iter().map(|&(_, w)| w).fold(f64::INFINITY, f64::min);
        let unit = unit.unwrap_or(smallest);
        if !(unit.is_finite() && unit > 0.0 && unit <= smallest) {
            return Err(StatsError::invalid(format!(
                "unit weight must be positive and at most the smallest weight {smallest}, got {unit}"
            )));
        }

        let (values, weights): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let cumulative = weights
            .iter()
            .scan(0.0, |total, &w| {
                *total += w;
                Some(*total)
            })
            .collect();

        Ok(Self {
            values,
            weights: Some(Weights {
                weights,
                cumulative,
                unit,
            }),
        })
    }

    /// Number of distinct entries (draws, or weighted pairs)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated sample
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the sample carries weights
    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }

    /// Sum of weights, or the number of draws for an unweighted sample
    pub fn total_weight(&self) -> f64 {
        match &self.weights {
            Some(w) => w.cumulative[w.cumulative.len() - 1],
            None => self.values.len() as f64,
        }
    }

    /// Values sorted ascending
    pub fn sorted_values(&self) -> &[f64] {
        &self.values
    }

    /// Weights aligned with `sorted_values`, if any
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| w.weights.as_slice())
    }

    /// Smallest value
    pub fn min(&self) -> f64 {
        self.values[0]
    }

    /// Largest value
    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Weighted mean of the sample
    pub fn mean(&self) -> f64 {
        match &self.weights {
            Some(w) => {
                self.values
                    .iter()
                    .zip(&w.weights)
                    .map(|(v, w)| v * w)
                    .sum::<f64>()
                    / self.total_weight()
            }
            None => self.values.iter().sum::<f64>() / self.values.len() as f64,
        }
    }

    /// Empirical quantile with linear interpolation between order statistics
    ///
    /// Uses the type 7 rule, h = (n - 1) p, with weighted samples counted
    /// in units of one draw.
    pub fn quantile(&self, p: f64) -> StatsResult<f64> {
        validation::validate_probability(p)?;
        Ok(self.quantile_unchecked(p))
    }

    pub(crate) fn quantile_unchecked(&self, p: f64) -> f64 {
        match &self.weights {
            Some(weights) => weighted_quantile(&self.values, weights, p),
            None => linear_quantile_sorted(&self.values, p),
        }
    }
}

/// Type 7 quantile over values repeated `weight / unit` times
///
/// In draw units, value i covers positions from `cumulative[i - 1]` up to
/// `cumulative[i] - unit`, and the next unit of position interpolates
/// linearly to value i + 1.
fn weighted_quantile(values: &[f64], weights: &Weights, p: f64) -> f64 {
    let cumulative = &weights.cumulative;
    let unit = weights.unit;
    let last = values.len() - 1;
    let h = (cumulative[last] - unit) * p;

    // First value whose flat stretch reaches h
    let i = cumulative.partition_point(|&c| c - unit < h).min(last);
    if i == 0 || h >= cumulative[i - 1] {
        return values[i];
    }

    let t = (h - (cumulative[i - 1] - unit)) / unit;
    (values[i - 1] + t * (values[i] - values[i - 1])).min(values[i])
}
