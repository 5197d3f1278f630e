//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Build quantile dotplots and HOP schedules from model draws
#[derive(Debug, Parser)]
#[command(name = "hopplot", version, about)]
pub struct Cli {
    /// Config file (defaults to <config dir>/hopplot/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long, global = true)]
    pub compact: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quantile dotplot values with a summary
    Dots(DotsArgs),
    /// Stacked dot positions ready for drawing
    Layout(LayoutArgs),
    /// Frame schedule for a hypothetical outcome plot
    Hops(HopsArgs),
}

/// Where the distribution comes from
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column with the draws
    #[arg(short, long, default_value = "value")]
    pub column: String,

    /// Column with per-row weights
    #[arg(short, long)]
    pub weight: Option<String>,

    /// Treat the input as histogram bins (lower, upper, count)
    #[arg(long, conflicts_with = "weight")]
    pub histogram: bool,

    /// Lower bin edge column
    #[arg(long, default_value = "lower")]
    pub lower: String,

    /// Upper bin edge column
    #[arg(long, default_value = "upper")]
    pub upper: String,

    /// Bin count column
    #[arg(long, default_value = "count")]
    pub count: String,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Debug, Clone, Args)]
pub struct DotsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of dots
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub dot_count: Option<i64>,

    /// Central interval level to report
    #[arg(long)]
    pub interval: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub dots: DotsArgs,

    /// Fixed column width
    #[arg(long)]
    pub binwidth: Option<f64>,

    /// Tallest column when choosing the width
    #[arg(long)]
    pub max_stack: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct HopsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Animate the dots of an N-dot dotplot instead of the raw draws
    #[arg(long, allow_negative_numbers = true)]
    pub dots: Option<i64>,

    /// Number of frames
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Shuffle seed
    #[arg(short, long)]
    pub seed: Option<u64>,
}
