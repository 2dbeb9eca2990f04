//! Report writers.
//!
//! - [`write_json`] / [`to_json`] - Pretty JSON, one view or all of them keyed by name
//! - [`write_csv_dir`] - One CSV table per series in a directory - requires `csv-output` feature
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> tgstats::Result<()> {
//! use std::path::Path;
//! use tgstats::format::{StatsReport, View};
//! use tgstats::output::{write_csv_dir, write_json};
//! use tgstats::pipeline::StatsEngine;
//!
//! let engine = StatsEngine::new();
//! engine.ingest_paths(&["ChatExport_2024-01-15"])?;
//!
//! let report = StatsReport::collect(&engine, View::All)?;
//! write_json(&report, View::All, Path::new("stats.json"))?;
//! write_csv_dir(&report, Path::new("stats_csv"))?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::write_csv_dir;
pub use json_writer::{to_json, write_json};
