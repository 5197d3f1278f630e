//! hopplot - quantile dotplots and HOP frames from model draws
//!
//! Reads draws or histogram bins from CSV and writes JSON for a charting
//! library to render.

mod cli;
mod commands;
mod config;
mod error;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::HopplotConfig;
use error::CliResult;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn,hopplot=info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = HopplotConfig::load(cli.config.as_deref())?;
    let report = commands::run(&cli.command, &config)?;

    let pretty = config.output.pretty && !cli.compact;
    write_report(&report, cli.output.as_deref(), pretty)?;
    Ok(())
}

fn write_report(report: &serde_json::Value, path: Option<&Path>, pretty: bool) -> CliResult<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = path {
        tracing::info!(path = %path.display(), "wrote report");
    }
    Ok(())
}
