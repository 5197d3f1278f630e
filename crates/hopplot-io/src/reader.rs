//! Reader errors and options

use hopplot_stats::StatsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading input data
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Cannot parse {value:?} in column '{column}' at line {line}")]
    Parse {
        line: u64,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Options for delimited input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: char,
    /// Cell values treated as missing
    pub missing: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            missing: vec![String::new(), "NA".to_string(), "NaN".to_string()],
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub(crate) fn is_missing(&self, cell: &str) -> bool {
        let cell = cell.trim();
        self.missing.iter().any(|m| m == cell)
    }

    pub(crate) fn delimiter_byte(&self) -> IoResult<u8> {
        if !self.delimiter.is_ascii() {
            return Err(IoError::InvalidFormat(format!(
                "delimiter {:?} is not an ASCII character",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }
}

/// Column names for histogram input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramColumns {
    pub lower: String,
    pub upper: String,
    pub count: String,
}

impl Default for HistogramColumns {
    fn default() -> Self {
        Self {
            lower: "lower".to_string(),
            upper: "upper".to_string(),
            count: "count".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells() {
        let options = CsvOptions::default();
        assert!(options.is_missing(""));
        assert!(options.is_missing(" NA "));
        assert!(!options.is_missing("0"));
    }

    #[test]
    fn test_delimiter_byte() {
        assert_eq!(CsvOptions::default().delimiter_byte().unwrap(), b',');
        assert_eq!(
            CsvOptions::default().with_delimiter('\t').delimiter_byte().unwrap(),
            b'\t'
        );
        assert!(CsvOptions::default().with_delimiter('€').delimiter_byte().is_err());
    }

    #[test]
    fn test_parse_error_display() {
        let err = IoError::Parse {
            line: 4,
            column: "y".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot parse \"abc\" in column 'y' at line 4");
    }
}
