//! Per-sender breakdown.

use std::collections::HashMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::core::MessageTable;
use crate::stats::{percent, round2};

/// One sender's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    /// 1-based rank by message count
    pub id: usize,
    /// Display name
    pub name: String,
    /// Messages sent
    pub messages: usize,
    /// Messages carrying a reply reference
    pub replies: usize,
    /// Share of all messages in percent
    pub contribution: f64,
    /// Mean word count per message
    pub avg_words: f64,
    /// Messages that restarted the chat after a long silence
    pub starters: usize,
}

/// All senders, busiest first. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsersView {
    /// Rows sorted by messages descending, then name
    pub rows: Vec<UserRow>,
}

impl UsersView {
    /// Finds a row by display name.
    pub fn get(&self, name: &str) -> Option<&UserRow> {
        self.rows.iter().find(|row| row.name == name)
    }
}

/// Builds the users view.
///
/// A message is a conversation starter when more than
/// `config.starter_gap_hours` passed since the previous message in the
/// dataset; the very first message is not counted.
pub fn users(table: &MessageTable, config: &StatsConfig) -> UsersView {
    let total = table.len();
    let gap = TimeDelta::hours(i64::from(config.starter_gap_hours));

    let mut starters: HashMap<&str, usize> = HashMap::new();
    for pair in table.messages().windows(2) {
        if pair[1].timestamp - pair[0].timestamp > gap {
            *starters.entry(pair[1].sender.as_str()).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<UserRow> = table
        .senders()
        .map(|sender| {
            let mut messages = 0;
            let mut replies = 0;
            let mut words = 0;
            for msg in table.by_sender(sender) {
                messages += 1;
                words += msg.word_count;
                if msg.is_reply() {
                    replies += 1;
                }
            }
            UserRow {
                id: 0,
                name: sender.to_string(),
                messages,
                replies,
                contribution: percent(messages, total),
                avg_words: if messages == 0 {
                    0.0
                } else {
                    round2(words as f64 / messages as f64)
                },
                starters: starters.get(sender).copied().unwrap_or(0),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.name.cmp(&b.name)));
    for (rank, row) in rows.iter_mut().enumerate() {
        row.id = rank + 1;
    }

    UsersView { rows }
}
