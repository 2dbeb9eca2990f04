//! Ingest and query entry points.
//!
//! [`StatsEngine`] is the one object a transport layer talks to. It owns the
//! [`DatasetStore`] and exposes:
//!
//! - [`ingest`](StatsEngine::ingest) - parse, merge and store one upload batch
//! - [`ingest_paths`](StatsEngine::ingest_paths) - the same, reading files from disk
//! - [`summary`](StatsEngine::summary), [`activity`](StatsEngine::activity),
//!   [`users`](StatsEngine::users), [`content`](StatsEngine::content) - the views
//!
//! # Example
//!
//! ```rust
//! use tgstats::pipeline::{StatsEngine, UploadedFile};
//!
//! let html = r#"<div class="history">
//!   <div class="message default clearfix" id="message1"><div class="body">
//!     <div class="pull_right date details" title="15.01.2024 10:30:00">10:30</div>
//!     <div class="from_name">Alice</div><div class="text">hello world</div>
//!   </div></div>
//! </div>"#;
//!
//! let engine = StatsEngine::new();
//! assert!(engine.summary().is_err());
//!
//! let report = engine.ingest(vec![UploadedFile::new("messages.html", html)])?;
//! assert_eq!(report.summary.total_messages, 1);
//! assert_eq!(engine.users()?.rows[0].name, "Alice");
//! # Ok::<(), tgstats::StatsError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::IngestConfig;
use crate::core::{
    Dataset, DatasetMeta, DatasetStore, IngestDiagnostics, IngestWarning, merge_exports,
    order_parts, part_number,
};
use crate::error::{Result, StatsError};
use crate::parsing::html::{HtmlExportParser, ParsedExport};
use crate::stats::{self, ActivityView, ContentView, SummaryView, UsersView};

const ACCEPTED_EXTENSIONS: &[&str] = &["html", "htm"];

/// One file of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Declared file name
    pub filename: String,
    /// Raw content
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Creates an uploaded file.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, named after its final path component.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| StatsError::io_at(e, path))?;
        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { filename, bytes })
    }

    fn has_accepted_extension(&self) -> bool {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
    }
}

/// Result of a successful ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Always `"ok"`
    pub status: String,
    /// First accepted file
    pub filename: String,
    /// Accepted files in input file order
    pub filenames: Vec<String>,
    /// Number of accepted files
    pub file_count: usize,
    /// Size of the whole batch in bytes
    pub total_bytes: u64,
    /// When the dataset was stored
    pub ingested_at: DateTime<Utc>,
    /// Human-readable outcome
    pub message: String,
    /// Summary view of the new dataset
    pub summary: SummaryView,
    /// Non-fatal problems
    pub diagnostics: IngestDiagnostics,
}

/// Owns the active dataset and answers queries against it.
///
/// All methods take `&self`; share the engine across threads with an `Arc`.
#[derive(Debug, Default)]
pub struct StatsEngine {
    config: IngestConfig,
    store: DatasetStore,
}

impl StatsEngine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            config,
            store: DatasetStore::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Returns the active dataset.
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        self.store.get()
    }

    // =========================================================================
    // Ingest
    // =========================================================================

    /// Parses, merges and stores one upload batch.
    ///
    /// The batch replaces any previous dataset, but only once every step
    /// succeeded; a failed ingest leaves the store untouched.
    ///
    /// # Errors
    ///
    /// - [`StatsError::PayloadTooLarge`] when the batch exceeds `max_upload_bytes`
    /// - [`StatsError::UnsupportedFile`], [`StatsError::Utf8`] or
    ///   [`StatsError::MalformedExport`] for a bad file, unless
    ///   `skip_malformed_files` is set
    /// - [`StatsError::EmptyDataset`] when no message survives
    pub fn ingest(&self, mut files: Vec<UploadedFile>) -> Result<IngestReport> {
        let total_bytes: u64 = files.iter().map(|f| f.bytes.len() as u64).sum();
        if total_bytes > self.config.max_upload_bytes {
            return Err(StatsError::PayloadTooLarge {
                limit: self.config.max_upload_bytes,
                actual: total_bytes,
            });
        }

        info!(files = files.len(), bytes = total_bytes, "ingest started");

        order_parts(&mut files, |f| f.filename.as_str());

        let parser = HtmlExportParser::with_config(self.config.parser.clone());
        let mut diagnostics = IngestDiagnostics::default();
        let mut exports: Vec<ParsedExport> = Vec::with_capacity(files.len());

        for file in files {
            match parse_file(&parser, file) {
                Ok(export) => exports.push(export),
                Err(e) if e.is_file_level() && self.config.skip_malformed_files => {
                    let file = rejected_file_name(&e);
                    warn!(file = %file, error = %e, "file rejected");
                    diagnostics.push(IngestWarning::RejectedFile {
                        file,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        for export in &exports {
            diagnostics.parsed_messages += export.messages.len();
            if export.skipped_blocks > 0 {
                diagnostics.push(IngestWarning::SkippedBlocks {
                    file: export.filename.clone(),
                    count: export.skipped_blocks,
                });
            }
        }

        let filenames: Vec<String> = exports.iter().map(|e| e.filename.clone()).collect();
        let rejected_files = diagnostics.rejected_files.len();

        let outcome = merge_exports(exports).map_err(|e| {
            if e.is_empty_dataset() {
                StatsError::EmptyDataset { rejected_files }
            } else {
                e
            }
        })?;

        for warning in outcome.warnings() {
            diagnostics.push(warning);
        }

        let ingested_at = Utc::now();
        let summary = stats::summary(&outcome.table);
        let meta = DatasetMeta {
            filenames: filenames.clone(),
            total_bytes,
            ingested_at,
            diagnostics: diagnostics.clone(),
        };
        self.store.replace(Dataset::new(outcome.table, meta));

        info!(
            files = filenames.len(),
            messages = summary.total_messages,
            users = summary.total_users,
            warnings = diagnostics.warnings.len(),
            "ingest finished"
        );

        Ok(IngestReport {
            status: "ok".to_string(),
            filename: filenames.first().cloned().unwrap_or_default(),
            file_count: filenames.len(),
            message: format!(
                "Processed {} file(s): {} messages from {} users",
                filenames.len(),
                summary.total_messages,
                summary.total_users
            ),
            filenames,
            total_bytes,
            ingested_at,
            summary,
            diagnostics,
        })
    }

    /// Reads export files from disk and ingests them as one batch.
    ///
    /// Directories contribute their `messages*.html` parts. Files are taken
    /// as given, so the extension check still applies to them.
    pub fn ingest_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<IngestReport> {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                for part in export_parts_in(path)? {
                    files.push(UploadedFile::from_path(&part)?);
                }
            } else {
                files.push(UploadedFile::from_path(path)?);
            }
        }
        self.ingest(files)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Headline totals.
    pub fn summary(&self) -> Result<SummaryView> {
        Ok(stats::summary(&self.dataset()?.table))
    }

    /// Timeline, hourly and weekday histograms.
    pub fn activity(&self) -> Result<ActivityView> {
        Ok(stats::activity(&self.dataset()?.table))
    }

    /// Per-sender rows.
    pub fn users(&self) -> Result<UsersView> {
        Ok(stats::users(&self.dataset()?.table, &self.config.stats))
    }

    /// Content mix and rankings.
    pub fn content(&self) -> Result<ContentView> {
        Ok(stats::content(&self.dataset()?.table, &self.config.stats))
    }
}

fn parse_file(parser: &HtmlExportParser, file: UploadedFile) -> Result<ParsedExport> {
    if !file.has_accepted_extension() {
        return Err(StatsError::UnsupportedFile {
            file: file.filename,
        });
    }

    let UploadedFile { filename, bytes } = file;
    let content = String::from_utf8(bytes).map_err(|source| StatsError::Utf8 {
        file: filename.clone(),
        source,
    })?;

    debug!(file = %filename, bytes = content.len(), "parsing export file");
    parser.parse_str(&content, &filename)
}

fn rejected_file_name(err: &StatsError) -> String {
    match err {
        StatsError::MalformedExport { file, .. }
        | StatsError::UnsupportedFile { file }
        | StatsError::Utf8 { file, .. } => file.clone(),
        _ => String::new(),
    }
}

/// `messages*.html` parts of an export directory, ordered by part number.
fn export_parts_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| StatsError::io_at(e, dir))?;

    let mut parts = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StatsError::io_at(e, dir))?.path();
        let is_part = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| part_number(name).is_some());
        if path.is_file() && is_part {
            parts.push(path);
        }
    }

    parts.sort();
    order_parts(&mut parts, |p| {
        p.file_name().and_then(|n| n.to_str()).unwrap_or_default()
    });
    Ok(parts)
}
