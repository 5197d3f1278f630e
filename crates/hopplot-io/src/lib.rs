//! hopplot-io - Data input for hopplot
//!
//! Modeling tools export their draws as delimited text, so this crate reads:
//!
//! - **Samples**: one column of draws, optionally with a weight column
//! - **Histograms**: lower edge, upper edge, and count columns
//!
//! Missing cells (`""`, `NA`, `NaN`) are skipped; anything else that fails
//! to parse as a number is an error carrying its line and column.

pub mod csv_reader;
pub mod reader;

pub use csv_reader::*;
pub use reader::*;
