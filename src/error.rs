//! Unified error types for tgstats.
//!
//! This module provides a single [`StatsError`] enum that covers every failure
//! the pipeline can report. The variants follow the taxonomy the dashboard
//! expects: malformed exports are fatal for a file, an empty dataset is fatal
//! for a batch, and a missing dataset is fatal only for the query that hit it.
//!
//! Non-fatal problems (skipped message blocks, unresolved reply references,
//! dropped duplicates) are not errors at all. They are collected as
//! [`IngestWarning`](crate::core::IngestWarning)s and returned alongside a
//! successful ingest.
//!
//! # Error Responses
//!
//! The transport layer never sees the enum directly. It receives an
//! [`ErrorResponse`] `{kind, message}` pair built with
//! [`StatsError::to_response`] and maps `kind` to a status code.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized [`Result`] type for tgstats operations.
///
/// # Example
///
/// ```rust
/// use tgstats::error::Result;
/// use tgstats::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, StatsError>;

/// The error type for all tgstats operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    /// The document lacks the structural markers of a Telegram HTML export.
    ///
    /// Raised before any message block is examined, so non-Telegram HTML is
    /// rejected early.
    #[error("Malformed Telegram export '{file}': {reason}")]
    MalformedExport {
        /// Declared name of the offending file
        file: String,
        /// What was missing
        reason: String,
    },

    /// No message survived parsing and merging.
    #[error("No messages found in the upload{}", if *rejected_files > 0 { format!(" ({} file(s) rejected)", rejected_files) } else { String::new() })]
    EmptyDataset {
        /// Number of files rejected as malformed before merging
        rejected_files: usize,
    },

    /// A query arrived before any ingest succeeded.
    #[error("No dataset loaded yet. Upload a Telegram export first")]
    NoDataset,

    /// The upload batch exceeds the configured size cap.
    #[error("Upload too large: {actual} bytes (maximum: {limit} bytes)")]
    PayloadTooLarge {
        /// Configured cap in bytes
        limit: u64,
        /// Total size of the batch in bytes
        actual: u64,
    },

    /// A file that is not an HTML export was submitted.
    #[error("Unsupported file '{file}': only Telegram HTML exports (.html, .htm) are accepted")]
    UnsupportedFile {
        /// Declared name of the offending file
        file: String,
    },

    /// File content is not valid UTF-8.
    #[error("UTF-8 encoding error in '{file}': {source}")]
    Utf8 {
        /// Declared name of the offending file
        file: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// An I/O error occurred.
    #[error("IO error{}: {source}", path.as_ref().map(|p| format!(" (path: {})", p.display())).unwrap_or_default())]
    Io {
        /// The underlying error
        #[source]
        source: io::Error,
        /// The path being read or written, if known
        path: Option<PathBuf>,
    },

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<io::Error> for StatsError {
    fn from(source: io::Error) -> Self {
        StatsError::Io { source, path: None }
    }
}

/// Structured `{kind, message}` pair handed to the transport layer.
///
/// ```rust
/// use tgstats::StatsError;
///
/// let response = StatsError::NoDataset.to_response();
/// assert_eq!(response.kind, "NoDatasetError");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Taxonomy name, e.g. `MalformedExportError`
    pub kind: String,
    /// Human-readable reason, with file attribution where it applies
    pub message: String,
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl StatsError {
    /// Creates a malformed export error.
    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        StatsError::MalformedExport {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Creates an I/O error attributed to a path.
    pub fn io_at(source: io::Error, path: impl Into<PathBuf>) -> Self {
        StatsError::Io {
            source,
            path: Some(path.into()),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        StatsError::InvalidConfig(message.into())
    }

    /// Returns the taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            StatsError::MalformedExport { .. } => "MalformedExportError",
            StatsError::EmptyDataset { .. } => "EmptyDatasetError",
            StatsError::NoDataset => "NoDatasetError",
            StatsError::PayloadTooLarge { .. } => "PayloadTooLargeError",
            StatsError::UnsupportedFile { .. } => "UnsupportedFileError",
            StatsError::Utf8 { .. } => "EncodingError",
            StatsError::Io { .. } => "IoError",
            StatsError::Json(_) => "SerializationError",
            #[cfg(feature = "csv-output")]
            StatsError::Csv(_) => "SerializationError",
            StatsError::InvalidConfig(_) => "InvalidConfigError",
        }
    }

    /// Converts the error into the `{kind, message}` pair.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }

    /// Returns `true` if this error rejected a single file.
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            StatsError::MalformedExport { .. }
                | StatsError::UnsupportedFile { .. }
                | StatsError::Utf8 { .. }
        )
    }

    /// Returns `true` if this is a malformed export error.
    pub fn is_malformed(&self) -> bool {
        matches!(self, StatsError::MalformedExport { .. })
    }

    /// Returns `true` if the batch produced no messages.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, StatsError::EmptyDataset { .. })
    }

    /// Returns `true` if no dataset has been ingested yet.
    pub fn is_no_dataset(&self) -> bool {
        matches!(self, StatsError::NoDataset)
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, StatsError::Io { .. })
    }
}
