//! Non-fatal ingest problems.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A problem that did not stop the ingest but may skew the numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IngestWarning {
    /// Message blocks in a file that could not be turned into messages.
    SkippedBlocks {
        /// Declared name of the file
        file: String,
        /// Number of blocks skipped
        count: usize,
    },
    /// Messages dropped because an overlapping file already contained them.
    DuplicatesDropped {
        /// Number of messages dropped
        count: usize,
    },
    /// Replies whose target is not in the dataset.
    UnresolvedReplies {
        /// Number of replies without a target
        count: usize,
    },
    /// A file rejected while `skip_malformed_files` was set.
    RejectedFile {
        /// Declared name of the file
        file: String,
        /// Error message for the rejection
        reason: String,
    },
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestWarning::SkippedBlocks { file, count } => {
                write!(f, "{file}: {count} message block(s) skipped")
            }
            IngestWarning::DuplicatesDropped { count } => {
                write!(f, "{count} duplicate message(s) dropped")
            }
            IngestWarning::UnresolvedReplies { count } => {
                write!(f, "{count} reply reference(s) point outside the dataset")
            }
            IngestWarning::RejectedFile { file, reason } => {
                write!(f, "{file} rejected: {reason}")
            }
        }
    }
}

/// Counters and warnings collected during one ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestDiagnostics {
    /// Messages produced by the parser across all accepted files
    pub parsed_messages: usize,
    /// Blocks skipped across all files
    pub skipped_blocks: usize,
    /// Messages dropped as duplicates
    pub duplicates_dropped: usize,
    /// Replies whose target is missing
    pub unresolved_replies: usize,
    /// Files rejected under `skip_malformed_files`
    pub rejected_files: Vec<String>,
    /// Every warning, in the order it was raised
    pub warnings: Vec<IngestWarning>,
}

impl IngestDiagnostics {
    /// Records a warning, updating the matching counter.
    pub fn push(&mut self, warning: IngestWarning) {
        match &warning {
            IngestWarning::SkippedBlocks { count, .. } => self.skipped_blocks += count,
            IngestWarning::DuplicatesDropped { count } => self.duplicates_dropped += count,
            IngestWarning::UnresolvedReplies { count } => self.unresolved_replies += count,
            IngestWarning::RejectedFile { file, .. } => self.rejected_files.push(file.clone()),
        }
        self.warnings.push(warning);
    }

    /// Returns `true` if nothing went wrong.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
