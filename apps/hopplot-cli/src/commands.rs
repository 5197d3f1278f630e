//! Command implementations
//!
//! Each command reads its source, runs the builder, and returns a report
//! that serializes to the JSON a charting library consumes.

use std::path::PathBuf;

use hopplot_io::{CsvOptions, CsvReader, HistogramColumns};
use hopplot_stats::{
    central_interval, DotColumn, DotLayout, DotPosition, DotSet, Ecdf, HopFrame, HopSchedule,
    Interval, MonotoneCubic, QuantileDotplotBuilder, Sample, Summary,
};
use serde::Serialize;

use crate::cli::{Command, DotsArgs, HopsArgs, LayoutArgs, SourceArgs};
use crate::config::HopplotConfig;
use crate::error::{CliError, CliResult};

/// A loaded distribution
#[derive(Debug, Clone)]
pub enum Source {
    /// Raw or weighted draws
    Sample(Sample),
    /// Histogram bins, as a monotone quantile function
    Histogram(MonotoneCubic),
}

/// Where a report's distribution came from
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub kind: &'static str,
    /// Draws, weighted pairs, or quantile control points
    pub size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DotsReport {
    pub source: SourceInfo,
    pub dot_count: usize,
    pub dots: Vec<f64>,
    pub probabilities: Vec<f64>,
    pub summary: Summary,
    pub interval: Interval,
    /// KS distance between the dots and the draws they summarise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ks_distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub source: SourceInfo,
    pub dot_count: usize,
    pub binwidth: f64,
    pub max_stack: usize,
    pub columns: Vec<DotColumn>,
    pub positions: Vec<DotPosition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HopsReport {
    pub source: SourceInfo,
    /// `draws` or `dots`
    pub animates: &'static str,
    pub seed: u64,
    pub frames: Vec<HopFrame<f64>>,
}

/// Run a command and return its JSON report
pub fn run(command: &Command, config: &HopplotConfig) -> CliResult<serde_json::Value> {
    let value = match command {
        Command::Dots(args) => serde_json::to_value(dots(args, config)?)?,
        Command::Layout(args) => serde_json::to_value(layout(args, config)?)?,
        Command::Hops(args) => serde_json::to_value(hops(args, config)?)?,
    };
    Ok(value)
}

/// Read the distribution named by the source arguments
pub fn load_source(args: &SourceArgs) -> CliResult<(Source, SourceInfo)> {
    let options = CsvOptions::default().with_delimiter(args.delimiter);
    let reader = CsvReader::open_with_options(&args.input, options)?;

    if args.histogram {
        let columns = HistogramColumns {
            lower: args.lower.clone(),
            upper: args.upper.clone(),
            count: args.count.clone(),
        };
        let bins = reader.read_histogram(&columns)?;
        let qf = MonotoneCubic::from_histogram(&bins)?;
        let info = SourceInfo {
            path: args.input.clone(),
            kind: "histogram",
            size: qf.control_points().len(),
        };
        return Ok((Source::Histogram(qf), info));
    }

    let sample = reader.read_sample(&args.column, args.weight.as_deref())?;
    let info = SourceInfo {
        path: args.input.clone(),
        kind: if sample.is_weighted() { "weighted" } else { "sample" },
        size: sample.len(),
    };
    Ok((Source::Sample(sample), info))
}

fn build_dots(source: &Source, dot_count: i64, config: &HopplotConfig) -> CliResult<DotSet> {
    if usize::try_from(dot_count).is_ok_and(|n| n > config.dotplot.max_dots) {
        tracing::warn!(
            dot_count,
            max_dots = config.dotplot.max_dots,
            "dot count is large enough to overplot"
        );
    }

    let builder = QuantileDotplotBuilder::new();
    let dots = match source {
        Source::Sample(sample) => builder.build_from_samples(sample, dot_count)?,
        Source::Histogram(qf) => builder.build_from_quantile_function(qf, dot_count)?,
    };
    Ok(dots)
}

fn dots_with_source(
    args: &DotsArgs,
    config: &HopplotConfig,
) -> CliResult<(DotSet, Source, SourceInfo)> {
    let (source, info) = load_source(&args.source)?;
    let dot_count = args.dot_count.unwrap_or(config.dotplot.dot_count);
    let dots = build_dots(&source, dot_count, config)?;
    Ok((dots, source, info))
}

/// `hopplot dots`
pub fn dots(args: &DotsArgs, config: &HopplotConfig) -> CliResult<DotsReport> {
    let (dots, source, info) = dots_with_source(args, config)?;
    let level = args.interval.unwrap_or(config.dotplot.interval);

    let ks_distance = match &source {
        Source::Sample(sample) if !sample.is_weighted() => {
            Some(dots.ecdf().ks_distance(&Ecdf::from_data(sample.sorted_values())))
        }
        _ => None,
    };

    tracing::info!(dots = dots.len(), kind = info.kind, "built quantile dotplot");

    Ok(DotsReport {
        source: info,
        dot_count: dots.len(),
        probabilities: dots.probabilities(),
        summary: Summary::from_dots(&dots)?,
        interval: central_interval(&dots, level)?,
        ks_distance,
        dots: dots.into_vec(),
    })
}

/// `hopplot layout`
pub fn layout(args: &LayoutArgs, config: &HopplotConfig) -> CliResult<LayoutReport> {
    let (dots, _, info) = dots_with_source(&args.dots, config)?;

    let binwidth = match args.binwidth.or(config.layout.binwidth) {
        Some(binwidth) => binwidth,
        None => {
            let max_stack = args.max_stack.unwrap_or(config.layout.max_stack);
            DotLayout::auto_binwidth(&dots, max_stack)?
        }
    };
    let layout = DotLayout::stack(&dots, binwidth)?;

    tracing::info!(
        columns = layout.columns().len(),
        max_stack = layout.max_stack(),
        binwidth,
        "stacked dots"
    );

    Ok(LayoutReport {
        source: info,
        dot_count: dots.len(),
        binwidth: layout.binwidth(),
        max_stack: layout.max_stack(),
        columns: layout.columns().to_vec(),
        positions: layout.positions().to_vec(),
    })
}

/// `hopplot hops`
pub fn hops(args: &HopsArgs, config: &HopplotConfig) -> CliResult<HopsReport> {
    let (source, info) = load_source(&args.source)?;

    let (values, animates) = match (args.dots, &source) {
        (Some(dot_count), _) => (build_dots(&source, dot_count, config)?.into_vec(), "dots"),
        (None, Source::Sample(sample)) if !sample.is_weighted() => {
            (sample.sorted_values().to_vec(), "draws")
        }
        (None, _) => {
            return Err(CliError::Usage(
                "weighted and histogram sources have no raw draws to animate; pass --dots N"
                    .to_string(),
            ))
        }
    };

    let frames = args.frames.unwrap_or(config.hops.frames);
    let seed = args.seed.unwrap_or(config.hops.seed);
    let schedule = HopSchedule::shuffled(values.len(), frames, seed)?;

    tracing::info!(frames = schedule.len(), seed, animates, "scheduled HOP frames");

    Ok(HopsReport {
        source: info,
        animates,
        seed: schedule.seed(),
        frames: schedule.apply(&values)?,
    })
}
