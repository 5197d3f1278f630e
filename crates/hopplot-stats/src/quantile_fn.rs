//! Quantile functions
//!
//! Some distributions arrive as a coarse summary rather than raw draws: a
//! histogram digitised from a published chart, with bins of unequal width.
//! Those are turned into a continuous quantile function by monotone cubic
//! interpolation through (cumulative probability, value) control points.
//!
//! The interpolant uses Fritsch-Carlson slope limiting, so it never
//! overshoots between control points and stays non-decreasing.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// A map from probability in [0, 1] to value, non-decreasing in p
pub trait QuantileFunction {
    /// Evaluate the quantile function at probability `p`
    fn quantile(&self, p: f64) -> f64;
}

impl<F> QuantileFunction for F
where
    F: Fn(f64) -> f64,
{
    fn quantile(&self, p: f64) -> f64 {
        self(p)
    }
}

/// One histogram bin `[lower, upper)` holding `count` observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: f64,
}

impl HistogramBin {
    pub fn new(lower: f64, upper: f64, count: f64) -> Self {
        Self {
            lower,
            upper,
            count,
        }
    }

    /// Bin width
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Count per unit width
    pub fn density(&self) -> f64 {
        self.count / self.width()
    }
}

/// Monotone cubic Hermite interpolant over quantile control points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonotoneCubic {
    /// Cumulative probabilities, strictly increasing in [0, 1]
    probs: Vec<f64>,
    /// Values at each probability, non-decreasing
    values: Vec<f64>,
    /// Hermite tangents at each control point
    slopes: Vec<f64>,
}

impl MonotoneCubic {
    /// Build from `(probability, value)` control points
    ///
    /// Requires at least two points, probabilities strictly increasing in
    /// [0, 1], and finite, non-decreasing values.
    pub fn new(points: &[(f64, f64)]) -> StatsResult<Self> {
        if points.len() < 2 {
            return Err(StatsError::invalid(format!(
                "monotone interpolation needs at least 2 control points, got {}",
                points.len()
            )));
        }

        for (idx, &(p, v)) in points.iter().enumerate() {
            if !(0.0..=1.0).contains(&p) {
                return Err(StatsError::invalid(format!(
                    "control point {idx} has probability {p} outside [0, 1]"
                )));
            }
            if !v.is_finite() {
                return Err(StatsError::invalid(format!(
                    "control point {idx} has non-finite value {v}"
                )));
            }
        }

        for (idx, pair) in points.windows(2).enumerate() {
            let (p0, v0) = pair[0];
            let (p1, v1) = pair[1];
            if p1 <= p0 {
                return Err(StatsError::invalid(format!(
                    "control point probabilities must be strictly increasing ({p0} then {p1} at index {})",
                    idx + 1
                )));
            }
            if v1 < v0 {
                return Err(StatsError::invalid(format!(
                    "control point values must be non-decreasing ({v0} then {v1} at index {})",
                    idx + 1
                )));
            }
        }

        let (probs, values): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let slopes = fritsch_carlson_slopes(&probs, &values);

        Ok(Self {
            probs,
            values,
            slopes,
        })
    }

    /// Build from contiguous, ascending histogram bins
    ///
    /// Control points are (0, lower edge of the first bin) followed by
    /// (cumulative share, upper edge) for each bin with a positive count.
    pub fn from_histogram(bins: &[HistogramBin]) -> StatsResult<Self> {
        if bins.is_empty() {
            return Err(StatsError::invalid("histogram must contain at least one bin"));
        }

        for (idx, bin) in bins.iter().enumerate() {
            if !bin.lower.is_finite() || !bin.upper.is_finite() || bin.upper <= bin.lower {
                return Err(StatsError::invalid(format!(
                    "bin {idx} has invalid edges [{}, {})",
                    bin.lower, bin.upper
                )));
            }
            if !bin.count.is_finite() || bin.count < 0.0 {
                return Err(StatsError::invalid(format!(
                    "bin {idx} has invalid count {}",
                    bin.count
                )));
            }
        }

        for (idx, pair) in bins.windows(2).enumerate() {
            if pair[1].lower < pair[0].upper {
                return Err(StatsError::invalid(format!(
                    "bins {idx} and {} overlap or are out of order",
                    idx + 1
                )));
            }
        }

        let total: f64 = bins.iter().map(|b| b.count).sum();
        if total <= 0.0 {
            return Err(StatsError::invalid("histogram total count must be positive"));
        }

        // Leading empty bins carry no probability, so start at the first
        // bin that holds any mass.
        let first = bins.iter().position(|b| b.count > 0.0).unwrap_or(0);
        let mut points = vec![(0.0, bins[first].lower)];
        let mut cumulative = 0.0;
        for bin in &bins[first..] {
            if bin.count == 0.0 {
                continue;
            }
            cumulative += bin.count;
            points.push(((cumulative / total).min(1.0), bin.upper));
        }

        tracing::debug!(
            bins = bins.len(),
            control_points = points.len(),
            "built quantile function from histogram"
        );

        Self::new(&points)
    }

    /// Smallest and largest values the function can return
    pub fn range(&self) -> (f64, f64) {
        (self.values[0], self.values[self.values.len() - 1])
    }

    /// Control points as (probability, value) pairs
    pub fn control_points(&self) -> Vec<(f64, f64)> {
        self.probs
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .collect()
    }

    fn evaluate(&self, p: f64) -> f64 {
        let last = self.probs.len() - 1;
        if p.is_nan() {
            return f64::NAN;
        }
        if p <= self.probs[0] {
            return self.values[0];
        }
        if p >= self.probs[last] {
            return self.values[last];
        }

        let k = self.probs.partition_point(|&q| q <= p) - 1;
        let h = self.probs[k + 1] - self.probs[k];
        let t = (p - self.probs[k]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        let value = h00 * self.values[k]
            + h10 * h * self.slopes[k]
            + h01 * self.values[k + 1]
            + h11 * h * self.slopes[k + 1];

        // Rounding can step a hair outside the segment
        value.clamp(self.values[k], self.values[k + 1])
    }
}

impl QuantileFunction for MonotoneCubic {
    fn quantile(&self, p: f64) -> f64 {
        self.evaluate(p)
    }
}

fn fritsch_carlson_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let secants: Vec<f64> = (0..n - 1)
        .map(|k| (ys[k + 1] - ys[k]) / (xs[k + 1] - xs[k]))
        .collect();

    let mut slopes = vec![0.0; n];
    slopes[0] = secants[0];
    slopes[n - 1] = secants[n - 2];
    for k in 1..n - 1 {
        let (left, right) = (secants[k - 1], secants[k]);
        slopes[k] = if left == 0.0 || right == 0.0 {
            0.0
        } else {
            (left + right) / 2.0
        };
    }

    for k in 0..n - 1 {
        let delta = secants[k];
        if delta == 0.0 {
            slopes[k] = 0.0;
            slopes[k + 1] = 0.0;
            continue;
        }
        let alpha = slopes[k] / delta;
        let beta = slopes[k + 1] / delta;
        let tau = alpha * alpha + beta * beta;
        if tau > 9.0 {
            let scale = 3.0 / tau.sqrt();
            slopes[k] = scale * alpha * delta;
            slopes[k + 1] = scale * beta * delta;
        }
    }

    slopes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_quantile_function() {
        let qf = |p: f64| 2.0 * p;
        assert_eq!(qf.quantile(0.25), 0.5);
    }

    #[test]
    fn test_linear_control_points_are_exact() {
        let qf = MonotoneCubic::new(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
        for p in [0.0, 0.125, 0.5, 0.875, 1.0] {
            assert!((qf.quantile(p) - p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_passes_through_control_points() {
        let points = [(0.0, 0.0), (0.2, 1.0), (0.5, 1.5), (0.9, 6.0), (1.0, 10.0)];
        let qf = MonotoneCubic::new(&points).unwrap();
        for &(p, v) in &points {
            assert!((qf.quantile(p) - v).abs() < 1e-12);
        }
        assert_eq!(qf.range(), (0.0, 10.0));
    }

    #[test]
    fn test_no_overshoot_on_step_data() {
        // A natural cubic spline overshoots here; the monotone one must not.
        let points = [(0.0, 0.0), (0.3, 0.0), (0.35, 5.0), (0.4, 5.0), (1.0, 5.0)];
        let qf = MonotoneCubic::new(&points).unwrap();

        let mut previous = f64::NEG_INFINITY;
        for i in 0..=1000 {
            let v = qf.quantile(i as f64 / 1000.0);
            assert!(v >= previous - 1e-12, "decreased at step {i}");
            assert!((0.0..=5.0).contains(&v));
            previous = v;
        }
    }

    #[test]
    fn test_clamps_outside_control_range() {
        let qf = MonotoneCubic::new(&[(0.1, 2.0), (0.9, 4.0)]).unwrap();
        assert_eq!(qf.quantile(0.0), 2.0);
        assert_eq!(qf.quantile(1.0), 4.0);
    }

    #[test]
    fn test_rejects_bad_control_points() {
        assert!(MonotoneCubic::new(&[(0.5, 1.0)]).is_err());
        assert!(MonotoneCubic::new(&[(0.0, 1.0), (0.0, 2.0)]).is_err());
        assert!(MonotoneCubic::new(&[(0.0, 2.0), (1.0, 1.0)]).is_err());
        assert!(MonotoneCubic::new(&[(0.0, 0.0), (1.5, 1.0)]).is_err());
        assert!(MonotoneCubic::new(&[(0.0, 0.0), (1.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_from_histogram_unequal_bins() {
        let bins = [
            HistogramBin::new(0.0, 1.0, 10.0),
            HistogramBin::new(1.0, 5.0, 30.0),
            HistogramBin::new(5.0, 6.0, 10.0),
        ];
        let qf = MonotoneCubic::from_histogram(&bins).unwrap();

        assert_eq!(qf.quantile(0.0), 0.0);
        assert!((qf.quantile(0.2) - 1.0).abs() < 1e-12);
        assert!((qf.quantile(0.8) - 5.0).abs() < 1e-12);
        assert_eq!(qf.quantile(1.0), 6.0);
        assert_eq!(bins[1].density(), 7.5);
    }

    #[test]
    fn test_from_histogram_skips_empty_bins() {
        let bins = [
            HistogramBin::new(-1.0, 0.0, 0.0),
            HistogramBin::new(0.0, 1.0, 5.0),
            HistogramBin::new(1.0, 2.0, 0.0),
            HistogramBin::new(2.0, 3.0, 5.0),
        ];
        let qf = MonotoneCubic::from_histogram(&bins).unwrap();
        assert_eq!(
            qf.control_points(),
            vec![(0.0, 0.0), (0.5, 1.0), (1.0, 3.0)]
        );
    }

    #[test]
    fn test_from_histogram_rejects_invalid_bins() {
        assert!(MonotoneCubic::from_histogram(&[]).is_err());
        assert!(MonotoneCubic::from_histogram(&[HistogramBin::new(1.0, 1.0, 3.0)]).is_err());
        assert!(MonotoneCubic::from_histogram(&[HistogramBin::new(0.0, 1.0, -3.0)]).is_err());
        assert!(MonotoneCubic::from_histogram(&[HistogramBin::new(0.0, 1.0, 0.0)]).is_err());
        assert!(MonotoneCubic::from_histogram(&[
            HistogramBin::new(0.0, 2.0, 1.0),
            HistogramBin::new(1.0, 3.0, 1.0),
        ])
        .is_err());
    }
}
