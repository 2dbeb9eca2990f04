//! Read-only analytical views over a [`MessageTable`].
//!
//! Each view is a pure function of the table (plus [`StatsConfig`] where a
//! ranking is involved) and serializes with camelCase keys:
//!
//! - [`summary`] - Headline totals and the busiest day
//! - [`activity`] - Daily timeline, hour-of-day and weekday histograms
//! - [`users`] - Per-sender breakdown
//! - [`content`] - Content types, message lengths, top emojis and words
//!
//! Percentages are computed from raw counts and rounded to two decimals only
//! when the view is built.
//!
//! [`StatsConfig`]: crate::config::StatsConfig

pub mod activity;
pub mod content;
pub mod summary;
pub mod users;

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;

use crate::core::MessageTable;

pub use activity::{ActivityView, HourlyPoint, TimelinePoint, WeekdayPoint, activity};
pub use content::{
    ContentView, EmojiCount, LengthBucket, TypeCount, WordCount, content,
};
pub use summary::{SummaryView, summary};
pub use users::{UserRow, UsersView, users};

/// Messages per local calendar date.
pub(crate) fn daily_counts(table: &MessageTable) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for msg in table {
        *counts.entry(msg.date()).or_insert(0) += 1;
    }
    counts
}

/// Every date from `first` to `last`, inclusive.
pub(crate) fn date_span(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |day| *day <= last)
}

/// `count / total * 100`, rounded to two decimals. Zero when `total` is zero.
pub(crate) fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Occurrence counter that remembers first-seen order.
///
/// [`top`](Tally::top) sorts by count descending and breaks ties by which key
/// was seen first, so rankings are deterministic.
#[derive(Debug)]
pub(crate) struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub(crate) fn top(mut self, n: usize) -> Vec<(K, usize)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(n);
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert!((percent(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((percent(2, 3) - 66.67).abs() < f64::EPSILON);
        assert!((percent(5, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_date_span_inclusive() {
        let first = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(date_span(first, last).count(), 4);
        assert_eq!(date_span(first, first).count(), 1);
    }

    #[test]
    fn test_tally_ties_keep_first_seen_order() {
        let mut tally = Tally::new();
        for key in ["b", "a", "c", "a", "c", "d"] {
            tally.add(key);
        }
        assert_eq!(tally.top(3), [("a", 2), ("c", 2), ("b", 1)]);
    }
}
