//! Empirical Cumulative Distribution Function (ECDF)
//!
//! The ECDF is a step function that estimates the underlying CDF of a sample.
//! For a sample of n values, ECDF(x) = (number of values <= x) / n.
//!
//! Also home to the type 7 sample quantile and the plotting positions the
//! dotplot builder uses. The Kolmogorov-Smirnov distance between two ECDFs
//! measures how far a dot set strays from the sample it summarises.

/// Plotting position of the k-th of n order statistics (1-based): (k - 0.5) / n
pub fn plotting_position(k: usize, n: usize) -> f64 {
    (k as f64 - 0.5) / n as f64
}

/// Quantile of pre-sorted data by linear interpolation between order statistics
///
/// Uses h = (n - 1) p, the type 7 rule. The caller guarantees `sorted` is
/// non-empty, ascending, and that `p` lies in [0, 1].
pub fn linear_quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        sorted[n - 1]
    } else {
        (sorted[j] + g * (sorted[j + 1] - sorted[j])).min(sorted[j + 1])
    }
}

/// Empirical Cumulative Distribution Function
#[derive(Debug, Clone)]
pub struct Ecdf {
    /// Sorted values
    values: Vec<f64>,
}

impl Ecdf {
    /// Build an ECDF from data
    ///
    /// Non-finite values are dropped.
    /// Time complexity: O(n log n) for sorting
    pub fn from_data(data: &[f64]) -> Self {
        let mut values: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        values.sort_by(f64::total_cmp);
        Self { values }
    }

    /// Evaluate the ECDF at a point
    ///
    /// Returns the proportion of values <= x
    /// Time complexity: O(log n)
    pub fn evaluate(&self, x: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let count = self.values.partition_point(|&v| v <= x);
        count as f64 / self.values.len() as f64
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the ECDF is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Kolmogorov-Smirnov distance sup |F(x) - G(x)| to another ECDF
    ///
    /// Both step functions only change at sample values, so checking the
    /// union of the two value sets is exact. Returns 1.0 if either is empty.
    pub fn ks_distance(&self, other: &Ecdf) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 1.0;
        }

        self.values
            .iter()
            .chain(other.values.iter())
            .map(|&x| (self.evaluate(x) - other.evaluate(x)).abs())
            .fold(0.0_f64, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecdf_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let ecdf = Ecdf::from_data(&data);

        assert_eq!(ecdf.len(), 5);
        assert_eq!(ecdf.evaluate(0.0), 0.0);
        assert_eq!(ecdf.evaluate(1.0), 0.2);
        assert_eq!(ecdf.evaluate(3.0), 0.6);
        assert_eq!(ecdf.evaluate(5.0), 1.0);
        assert_eq!(ecdf.evaluate(6.0), 1.0);
    }

    #[test]
    fn test_ecdf_empty() {
        let ecdf = Ecdf::from_data(&[]);
        assert!(ecdf.is_empty());
        assert_eq!(ecdf.evaluate(0.0), 0.0);
    }

    #[test]
    fn test_ecdf_duplicates() {
        let data = vec![1.0, 1.0, 2.0, 2.0, 2.0, 3.0];
        let ecdf = Ecdf::from_data(&data);

        assert!((ecdf.evaluate(1.0) - 2.0 / 6.0).abs() < 1e-10);
        assert!((ecdf.evaluate(2.0) - 5.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_linear_quantile_sorted() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(linear_quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(linear_quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(linear_quantile_sorted(&sorted, 1.0), 4.0);
        assert_eq!(linear_quantile_sorted(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn test_plotting_position() {
        assert_eq!(plotting_position(1, 4), 0.125);
        assert_eq!(plotting_position(4, 4), 0.875);
    }

    #[test]
    fn test_ks_distance() {
        let a = Ecdf::from_data(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.ks_distance(&a), 0.0);

        let b = Ecdf::from_data(&[10.0, 11.0]);
        assert_eq!(a.ks_distance(&b), 1.0);

        let c = Ecdf::from_data(&[1.0, 2.0]);
        assert!((a.ks_distance(&c) - 0.5).abs() < 1e-12);
    }
}
