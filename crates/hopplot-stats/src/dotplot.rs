//! Quantile dotplot construction
//!
//! A quantile dotplot shows a distribution as N dots, each standing for an
//! equal 1/N share of cumulative probability. Dot i sits at the quantile
//! of probability (i - 0.5) / N, which keeps every dot away from the
//! probabilities 0 and 1 where open-ended distributions have no finite
//! quantile.
//!
//! # Example
//!
//! ```
//! use hopplot_stats::{QuantileDotplotBuilder, Sample};
//!
//! let sample = Sample::from_values((0..=100).map(|x| x as f64).collect()).unwrap();
//! let dots = QuantileDotplotBuilder::new().build_from_samples(&sample, 4).unwrap();
//! assert_eq!(dots.values(), &[12.5, 37.5, 62.5, 87.5]);
//! ```

use serde::{Deserialize, Serialize};

use crate::ecdf::{plotting_position, Ecdf};
use crate::error::{validation, StatsError, StatsResult};
use crate::quantile_fn::QuantileFunction;
use crate::sample::Sample;

/// Relative slack allowed when checking a quantile function is monotone
///
/// Decreases within this slack are treated as rounding and flattened.
const MONOTONE_TOLERANCE: f64 = 1e-12;

/// N representative values, one per 1/N slice of cumulative probability
///
/// Always sorted ascending and free of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DotSetRepr")]
pub struct DotSet {
    dots: Vec<f64>,
}

#[derive(Deserialize)]
struct DotSetRepr {
    dots: Vec<f64>,
}

impl TryFrom<DotSetRepr> for DotSet {
    type Error = StatsError;

    fn try_from(repr: DotSetRepr) -> StatsResult<Self> {
        let dots = repr.dots;
        if dots.is_empty() {
            return Err(StatsError::invalid("dot set must contain at least one dot"));
        }
        if dots.iter().any(|d| d.is_nan()) {
            return Err(StatsError::invalid("dot set contains NaN"));
        }
        if dots.windows(2).any(|w| w[1] < w[0]) {
            return Err(StatsError::invalid("dots must be sorted ascending"));
        }
        Ok(Self { dots })
    }
}

impl DotSet {
    /// Number of dots
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    /// Always false for a built dot set
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Dot values, ascending
    pub fn values(&self) -> &[f64] {
        &self.dots
    }

    /// Cumulative probability each dot represents
    pub fn probabilities(&self) -> Vec<f64> {
        plotting_positions(self.dots.len())
    }

    /// Probability mass carried by a single dot
    pub fn mass_per_dot(&self) -> f64 {
        1.0 / self.dots.len() as f64
    }

    /// Mean of the dot values
    pub fn mean(&self) -> f64 {
        self.dots.iter().sum::<f64>() / self.dots.len() as f64
    }

    /// Share of dots at or below `x`
    pub fn probability_at_most(&self, x: f64) -> f64 {
        self.dots.partition_point(|&d| d <= x) as f64 / self.dots.len() as f64
    }

    /// ECDF of the dot values
    pub fn ecdf(&self) -> Ecdf {
        Ecdf::from_data(&self.dots)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.dots.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.dots
    }
}

impl<'a> IntoIterator for &'a DotSet {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.dots.iter()
    }
}

/// Evenly spaced plotting positions (i - 0.5) / n for i = 1..=n
pub fn plotting_positions(n: usize) -> Vec<f64> {
    (1..=n).map(|i| plotting_position(i, n)).collect()
}

/// Builds quantile dotplots from samples or quantile functions
///
/// The builder holds no state; every call is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantileDotplotBuilder;

impl QuantileDotplotBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a dot set from the empirical quantiles of a sample
    ///
    /// Fails if `dot_count` is not positive. When `dot_count` exceeds the
    /// sample size several dots share an order statistic.
    pub fn build_from_samples(&self, sample: &Sample, dot_count: i64) -> StatsResult<DotSet> {
        let n = validation::validate_dot_count(dot_count)?;
        if sample.is_empty() {
            return Err(StatsError::invalid("sample must contain at least one value"));
        }

        if n > sample.len() {
            tracing::debug!(
                dot_count = n,
                sample_size = sample.len(),
                "dot count exceeds sample size, order statistics will repeat"
            );
        }

        let dots: Vec<f64> = plotting_positions(n)
            .into_iter()
            .map(|p| sample.quantile_unchecked(p))
            .collect();

        tracing::debug!(
            dots = dots.len(),
            weighted = sample.is_weighted(),
            "built dot set from sample"
        );
        Ok(DotSet { dots })
    }

    /// Build a dot set by evaluating a quantile function at each plotting position
    ///
    /// Fails if `dot_count` is not positive, if `qf` returns NaN, or if its
    /// outputs decrease anywhere (the function is not monotone).
    pub fn build_from_quantile_function<Q>(&self, qf: &Q, dot_count: i64) -> StatsResult<DotSet>
    where
        Q: QuantileFunction + ?Sized,
    {
        let n = validation::validate_dot_count(dot_count)?;

        let positions = plotting_positions(n);
        let mut dots = Vec::with_capacity(n);
        for &p in &positions {
            let value = qf.quantile(p);
            if value.is_nan() {
                return Err(StatsError::invalid(format!(
                    "quantile function returned NaN at p = {p}"
                )));
            }
            let value = match dots.last() {
                Some(&previous) if value < previous => {
                    let slack = MONOTONE_TOLERANCE * previous.abs().max(1.0);
                    if previous - value > slack {
                        return Err(StatsError::invalid(format!(
                            "quantile function is not monotone: q({p}) = {value} < {previous}"
                        )));
                    }
                    previous
                }
                _ => value,
            };
            dots.push(value);
        }

        tracing::debug!(dots = dots.len(), "built dot set from quantile function");
        Ok(DotSet { dots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantile_fn::{HistogramBin, MonotoneCubic};

    fn builder() -> QuantileDotplotBuilder {
        QuantileDotplotBuilder::new()
    }

    #[test]
    fn test_plotting_positions() {
        assert_eq!(plotting_positions(4), vec![0.125, 0.375, 0.625, 0.875]);
        assert_eq!(plotting_positions(1), vec![0.5]);
    }

    #[test]
    fn test_single_point_sample_repeats() {
        let sample = Sample::from_values(vec![7.5]).unwrap();
        for n in [1, 5, 100] {
            let dots = builder().build_from_samples(&sample, n).unwrap();
            assert_eq!(dots.len(), n as usize);
            assert!(dots.iter().all(|&d| d == 7.5));
        }
    }

    #[test]
    fn test_more_dots_than_draws() {
        let sample = Sample::from_values(vec![1.0, 2.0]).unwrap();
        let dots = builder().build_from_samples(&sample, 8).unwrap();
        assert_eq!(dots.len(), 8);
        assert!(dots.values().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(dots.values()[0], 1.0 + 0.0625);
    }

    #[test]
    fn test_uniform_grid_mean() {
        // Dense grid over [0, 10] stands in for a uniform sample
        let values: Vec<f64> = (0..=10_000).map(|i| i as f64 / 1000.0).collect();
        let sample = Sample::from_values(values).unwrap();
        let dots = builder().build_from_samples(&sample, 1000).unwrap();
        assert!((dots.mean() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_sample() {
        let sample = Sample::from_weighted(vec![(0.0, 1.0), (1.0, 3.0)]).unwrap();
        let dots = builder().build_from_samples(&sample, 4).unwrap();
        // Same dots as the draws [0, 1, 1, 1]
        assert!((dots.values()[0] - 0.375).abs() < 1e-12);
        assert_eq!(&dots.values()[1..], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_counted_sample_matches_expanded_draws() {
        let counted = Sample::from_counts(&[0.0, 10.0], &[2, 2]).unwrap();
        let expanded = Sample::from_values(vec![0.0, 0.0, 10.0, 10.0]).unwrap();
        for n in [2, 4, 7] {
            assert_eq!(
                builder().build_from_samples(&counted, n).unwrap(),
                builder().build_from_samples(&expanded, n).unwrap()
            );
        }
    }

    #[test]
    fn test_rejects_bad_dot_count() {
        let sample = Sample::from_values(vec![1.0, 2.0]).unwrap();
        for n in [0, -1, -100] {
            assert!(matches!(
                builder().build_from_samples(&sample, n),
                Err(StatsError::InvalidArgument(_))
            ));
            assert!(matches!(
                builder().build_from_quantile_function(&|p: f64| p, n),
                Err(StatsError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_identity_quantile_function() {
        let dots = builder().build_from_quantile_function(&|p: f64| p, 4).unwrap();
        let expected = [0.125, 0.375, 0.625, 0.875];
        for (d, e) in dots.iter().zip(expected) {
            assert!((d - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_non_monotone_quantile_function() {
        let wave = |p: f64| (4.0 * std::f64::consts::PI * p).sin();
        let err = builder().build_from_quantile_function(&wave, 20).unwrap_err();
        assert!(err.to_string().contains("not monotone"));
    }

    #[test]
    fn test_flattens_rounding_level_decrease() {
        // Steps down by 1e-15 past p = 0.5
        let qf = |p: f64| if p > 0.5 { 1.0 - 1e-15 } else { 1.0 };
        let dots = builder().build_from_quantile_function(&qf, 6).unwrap();
        assert_eq!(dots.values(), &[1.0; 6]);
    }

    #[test]
    fn test_rejects_decrease_beyond_slack() {
        let qf = |p: f64| if p > 0.5 { 1.0 - 1e-10 } else { 1.0 };
        let err = builder().build_from_quantile_function(&qf, 6).unwrap_err();
        assert!(err.to_string().contains("not monotone"));
    }

    #[test]
    fn test_deserialize_validates_dots() {
        let dots: DotSet = serde_json::from_str(r#"{"dots":[0.5,1.5]}"#).unwrap();
        assert_eq!(dots.values(), &[0.5, 1.5]);

        assert!(serde_json::from_str::<DotSet>(r#"{"dots":[]}"#).is_err());
        assert!(serde_json::from_str::<DotSet>(r#"{"dots":[2.0,1.0]}"#).is_err());
    }

    #[test]
    fn test_rejects_nan_quantile_function() {
        let qf = |p: f64| if p > 0.5 { f64::NAN } else { p };
        assert!(builder().build_from_quantile_function(&qf, 4).is_err());
    }

    #[test]
    fn test_dots_from_histogram_stay_in_range() {
        let bins = [
            HistogramBin::new(0.0, 2.0, 4.0),
            HistogramBin::new(2.0, 3.0, 10.0),
            HistogramBin::new(3.0, 8.0, 6.0),
        ];
        let qf = MonotoneCubic::from_histogram(&bins).unwrap();
        let dots = builder().build_from_quantile_function(&qf, 50).unwrap();
        let (lo, hi) = qf.range();
        assert!(dots.iter().all(|&d| (lo..=hi).contains(&d)));
        assert!(dots.values().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_dot_set_probabilities() {
        let sample = Sample::from_values(vec![1.0, 2.0, 3.0]).unwrap();
        let dots = builder().build_from_samples(&sample, 2).unwrap();
        assert_eq!(dots.probabilities(), vec![0.25, 0.75]);
        assert_eq!(dots.mass_per_dot(), 0.5);
        assert_eq!(dots.probability_at_most(1.5), 0.5);
    }
}
