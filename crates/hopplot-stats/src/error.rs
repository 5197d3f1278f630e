//! Error types for hopplot-stats
//!
//! Every failure in this crate is a caller error: a bad dot count, an
//! empty or malformed sample, or a quantile function that is not monotone.
//! Nothing is transient, so nothing is retried.

use thiserror::Error;

/// Main error type for statistical operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// An argument violated the operation's contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl StatsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        StatsError::InvalidArgument(message.into())
    }
}

/// Result type alias for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Validation utilities shared by the builders
pub mod validation {
    use super::*;

    /// Validate a requested dot count and convert it to a length
    pub fn validate_dot_count(dot_count: i64) -> StatsResult<usize> {
        if dot_count <= 0 {
            return Err(StatsError::invalid(format!(
                "dot_count must be positive, got {dot_count}"
            )));
        }
        usize::try_from(dot_count)
            .map_err(|_| StatsError::invalid(format!("dot_count {dot_count} is too large")))
    }

    /// Validate a probability lies in [0, 1]
    pub fn validate_probability(p: f64) -> StatsResult<()> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StatsError::invalid(format!(
                "probability must be in [0, 1], got {p}"
            )));
        }
        Ok(())
    }

    /// Validate every value is finite
    pub fn validate_finite(values: &[f64], what: &str) -> StatsResult<()> {
        if let Some((idx, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(StatsError::invalid(format!(
                "{what} must be finite, found {v} at index {idx}"
            )));
        }
        Ok(())
    }
}
