//! hopplot-stats - Quantile dotplots and hypothetical outcome plots
//!
//! This crate turns a distribution into a small, fixed set of representative
//! values suitable for one-dot-per-unit-probability rendering:
//!
//! - **Sample**: validated draws, optionally weighted, with empirical quantiles
//! - **QuantileFunction**: monotone quantile functions, including a monotone
//!   cubic interpolant built from a coarse histogram
//! - **QuantileDotplotBuilder**: N dots at the plotting positions (i - 0.5) / N
//! - **DotLayout**: stacks dots into columns for drawing
//! - **HopSchedule**: seeded frame order for animated outcome plots
//!
//! Every operation is pure and deterministic given its inputs (and, for
//! HOPs, the seed). Rendering is left to a charting library.

pub mod dotplot;
pub mod ecdf;
pub mod error;
pub mod hops;
pub mod layout;
pub mod quantile_fn;
pub mod sample;
pub mod summary;

pub use dotplot::*;
pub use ecdf::*;
pub use error::{StatsError, StatsResult};
pub use hops::*;
pub use layout::*;
pub use quantile_fn::*;
pub use sample::*;
pub use summary::*;
