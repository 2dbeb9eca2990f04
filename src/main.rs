//! # tgstats CLI
//!
//! Command-line interface for the tgstats library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tgstats::StatsError;
use tgstats::cli::Args;
use tgstats::config::IngestConfig;
use tgstats::format::{StatsReport, View};
use tgstats::output::{to_json, write_json};
use tgstats::pipeline::StatsEngine;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error [{}]: {}", e.kind(), e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), StatsError> {
    let start = Instant::now();

    let mut config = match &args.config {
        Some(path) => IngestConfig::from_json_file(path)?,
        None => IngestConfig::default(),
    };
    if let Some(top) = args.top {
        config.stats.top_n = top;
    }
    config.validate()?;

    let engine = StatsEngine::with_config(config);
    let report = engine.ingest_paths(&args.inputs)?;

    for warning in &report.diagnostics.warnings {
        tracing::warn!("{warning}");
    }
    info!(
        files = report.file_count,
        messages = report.summary.total_messages,
        users = report.summary.total_users,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{}",
        report.message
    );

    let view: View = args.view.into();
    let stats = StatsReport::collect(&engine, view)?;

    match &args.output {
        Some(path) => {
            write_json(&stats, view, path)?;
            info!(path = %path.display(), "JSON written");
        }
        None => println!("{}", to_json(&stats, view)?),
    }

    if let Some(dir) = &args.csv_dir {
        let written = tgstats::output::write_csv_dir(&stats, dir)?;
        info!(dir = %dir.display(), files = written.len(), "CSV tables written");
    }

    Ok(())
}
