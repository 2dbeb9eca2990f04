//! Dataset construction and storage.
//!
//! This module contains:
//! - [`merge`] - Ordering, merging and de-duplicating export parts
//! - [`table`] - The immutable [`MessageTable`]
//! - [`store`] - The [`DatasetStore`] holding the latest [`Dataset`]
//! - [`diagnostics`] - Non-fatal [`IngestWarning`]s
//!
//! # Quick Start
//!
//! ```rust
//! use tgstats::config::ParserConfig;
//! use tgstats::core::merge_exports;
//! use tgstats::parsing::parse_export;
//!
//! let html = r#"<div class="history">
//!   <div class="message default clearfix" id="message1"><div class="body">
//!     <div class="pull_right date details" title="15.01.2024 10:30:00">10:30</div>
//!     <div class="from_name">Alice</div><div class="text">hi</div>
//!   </div></div>
//! </div>"#;
//!
//! let export = parse_export(html, "messages.html", &ParserConfig::default())?;
//! let outcome = merge_exports(vec![export])?;
//! assert_eq!(outcome.table.len(), 1);
//! # Ok::<(), tgstats::StatsError>(())
//! ```

pub mod diagnostics;
pub mod merge;
pub mod store;
pub mod table;

pub use diagnostics::{IngestDiagnostics, IngestWarning};
pub use merge::{MergeOutcome, merge_exports, order_parts, part_number};
pub use store::{Dataset, DatasetMeta, DatasetStore};
pub use table::MessageTable;
