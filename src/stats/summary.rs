//! Headline totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::MessageTable;
use crate::stats::daily_counts;

/// Dataset-wide totals and the busiest day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    /// Number of messages in the table
    pub total_messages: usize,
    /// Number of distinct senders
    pub total_users: usize,
    /// Number of dates with at least one message
    pub active_days: usize,
    /// Date with the most messages; the earliest one on ties
    pub peak_activity_date: Option<NaiveDate>,
    /// Message count on the peak date
    pub peak_message_count: usize,
}

/// Builds the summary view.
pub fn summary(table: &MessageTable) -> SummaryView {
    let daily = daily_counts(table);

    // BTreeMap iterates dates ascending, so a strict comparison keeps the earliest peak.
    let mut peak: Option<(NaiveDate, usize)> = None;
    for (&date, &count) in &daily {
        if peak.is_none_or(|(_, best)| count > best) {
            peak = Some((date, count));
        }
    }

    SummaryView {
        total_messages: table.len(),
        total_users: table.sender_count(),
        active_days: daily.len(),
        peak_activity_date: peak.map(|(date, _)| date),
        peak_message_count: peak.map_or(0, |(_, count)| count),
    }
}
