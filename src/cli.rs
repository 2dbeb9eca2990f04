//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`ViewArg`] - The `--view` choices, convertible to [`format::View`](crate::format::View)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::format::View;

/// Compute chat statistics from Telegram Desktop HTML exports.
#[derive(Parser, Debug, Clone)]
#[command(name = "tgstats")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tgstats ChatExport_2024-01-15/
    tgstats messages.html messages2.html --view users
    tgstats ChatExport/ -o stats.json --csv-dir stats_csv
    RUST_LOG=tgstats=debug tgstats ChatExport/ --view summary")]
pub struct Args {
    /// Export files or export directories
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// View to render
    #[arg(long, value_enum, default_value = "all")]
    pub view: ViewArg,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write one CSV table per series into this directory
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Length of the emoji and word rankings
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

/// View selection for the `--view` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ViewArg {
    /// Headline totals
    Summary,
    /// Timeline, hourly and weekday histograms
    Activity,
    /// Per-sender rows
    Users,
    /// Content mix and rankings
    Content,
    /// Every view
    All,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Summary => View::Summary,
            ViewArg::Activity => View::Activity,
            ViewArg::Users => View::Users,
            ViewArg::Content => View::Content,
            ViewArg::All => View::All,
        }
    }
}
