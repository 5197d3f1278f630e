//! CLI error types

use hopplot_io::IoError;
use hopplot_stats::StatsError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;
