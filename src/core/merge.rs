//! Combining per-part exports into one table.
//!
//! Telegram Desktop splits long chats into `messages.html`,
//! `messages2.html`, `messages3.html` and so on. Parts are ordered by that
//! number, merged by timestamp, and de-duplicated: a message is a duplicate
//! when an earlier file already produced the same id and the two files'
//! timestamp ranges overlap. The overlap requirement keeps two unrelated
//! chats that happen to reuse ids from losing messages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::diagnostics::IngestWarning;
use crate::core::table::MessageTable;
use crate::error::{Result, StatsError};
use crate::message::{Message, MessageId};
use crate::parsing::html::ParsedExport;

static PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[/\\])messages(\d*)\.html?$").expect("part pattern is valid")
});

/// Merged table plus what the merge had to drop or could not resolve.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged, timestamp-ordered table
    pub table: MessageTable,
    /// Messages dropped as duplicates
    pub duplicates_dropped: usize,
    /// Replies whose target is missing after merging
    pub unresolved_replies: usize,
}

impl MergeOutcome {
    /// Warnings for the ingest report. Zero counts produce no warning.
    pub fn warnings(&self) -> Vec<IngestWarning> {
        let mut warnings = Vec::new();
        if self.duplicates_dropped > 0 {
            warnings.push(IngestWarning::DuplicatesDropped {
                count: self.duplicates_dropped,
            });
        }
        if self.unresolved_replies > 0 {
            warnings.push(IngestWarning::UnresolvedReplies {
                count: self.unresolved_replies,
            });
        }
        warnings
    }
}

/// Export part number: `messages.html` is 0, `messages7.html` is 7.
///
/// ```
/// use tgstats::core::merge::part_number;
///
/// assert_eq!(part_number("messages.html"), Some(0));
/// assert_eq!(part_number("messages1.html"), Some(1));
/// assert_eq!(part_number("export/messages12.html"), Some(12));
/// assert_eq!(part_number("chat.html"), None);
/// ```
pub fn part_number(filename: &str) -> Option<u32> {
    let caps = PART_RE.captures(filename)?;
    match &caps[1] {
        "" => Some(0),
        digits => digits.parse().ok(),
    }
}

/// Stable-sorts items by export part number; unnumbered names go last in
/// their original order.
pub fn order_parts<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| part_number(name(item)).unwrap_or(u32::MAX));
}

/// Merges parsed exports, given in input file order, into one table.
///
/// Messages are ordered by timestamp; equal timestamps keep file order, then
/// position within the file. Fails with [`StatsError::EmptyDataset`] when no
/// message remains.
pub fn merge_exports(exports: Vec<ParsedExport>) -> Result<MergeOutcome> {
    // Earlier files whose timestamp range overlaps each file.
    let overlapping: Vec<Vec<usize>> = (0..exports.len())
        .map(|j| {
            (0..j)
                .filter(|&i| exports[i].overlaps(&exports[j]))
                .collect()
        })
        .collect();
    let mut kept_ids: Vec<HashSet<MessageId>> = Vec::with_capacity(exports.len());
    let mut merged: Vec<Message> = Vec::new();
    let mut duplicates_dropped = 0;

    for (export, overlapping) in exports.into_iter().zip(overlapping) {
        let mut ids = HashSet::with_capacity(export.messages.len());
        let mut dropped_here = 0;

        for msg in export.messages {
            let seen = ids.contains(&msg.id)
                || overlapping.iter().any(|&i| kept_ids[i].contains(&msg.id));
            if seen {
                dropped_here += 1;
                continue;
            }
            ids.insert(msg.id);
            merged.push(msg);
        }

        if dropped_here > 0 {
            debug!(
                file = %export.filename,
                dropped = dropped_here,
                "dropped duplicate messages"
            );
        }
        duplicates_dropped += dropped_here;
        kept_ids.push(ids);
    }

    if merged.is_empty() {
        return Err(StatsError::EmptyDataset { rejected_files: 0 });
    }

    let table = MessageTable::new(merged);
    let unresolved_replies = table.unresolved_replies();

    debug!(
        messages = table.len(),
        duplicates_dropped, unresolved_replies, "merged exports"
    );

    Ok(MergeOutcome {
        table,
        duplicates_dropped,
        unresolved_replies,
    })
}
