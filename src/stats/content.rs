//! Content mix, message lengths and vocabulary.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::core::MessageTable;
use crate::message::ContentType;
use crate::parsing::text::{emojis, words};
use crate::stats::{Tally, date_span};

/// Character-length buckets: label and inclusive upper bound.
const LENGTH_BUCKETS: [(&str, usize); 5] = [
    ("0-10", 10),
    ("11-50", 50),
    ("51-100", 100),
    ("101-500", 500),
    ("500+", usize::MAX),
];

/// Messages of one content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    /// Content type name, e.g. `photo`
    pub name: String,
    /// Number of messages
    pub value: usize,
}

/// Messages whose text length falls in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBucket {
    /// Bucket label, e.g. `11-50`
    pub range: String,
    /// Number of messages
    pub count: usize,
}

/// Occurrences of one emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiCount {
    /// The emoji sequence
    pub emoji: String,
    /// Total occurrences
    pub count: usize,
}

/// Occurrences of one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    /// Case-folded word
    pub word: String,
    /// Total occurrences
    pub count: usize,
}

/// Content-type mix, length distribution and top-N rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    /// All eight content types in fixed order, zeros included
    pub types: Vec<TypeCount>,
    /// Five length buckets in ascending order
    pub length_dist: Vec<LengthBucket>,
    /// Most used emojis
    pub emojis: Vec<EmojiCount>,
    /// Most used words, stoplist excluded
    pub top_words: Vec<WordCount>,
    /// Dates inside the dataset's span with no messages
    pub inactive_days: Vec<NaiveDate>,
}

/// Builds the content view.
pub fn content(table: &MessageTable, config: &StatsConfig) -> ContentView {
    let mut type_counts = [0usize; 8];
    let mut length_counts = [0usize; LENGTH_BUCKETS.len()];
    let mut emoji_tally = Tally::new();
    let mut word_tally = Tally::new();
    let mut active = BTreeSet::new();

    for msg in table {
        if let Some(idx) = ContentType::all().iter().position(|ct| *ct == msg.content_type) {
            type_counts[idx] += 1;
        }

        if let Some(idx) = LENGTH_BUCKETS
            .iter()
            .position(|(_, upper)| msg.char_length <= *upper)
        {
            length_counts[idx] += 1;
        }

        for emoji in emojis(&msg.text) {
            emoji_tally.add(emoji.to_string());
        }

        for word in words(&msg.text) {
            if word.chars().count() >= config.min_word_length && !config.is_stopword(&word) {
                word_tally.add(word);
            }
        }

        active.insert(msg.date());
    }

    let types = ContentType::all()
        .iter()
        .zip(type_counts)
        .map(|(ct, value)| TypeCount {
            name: ct.as_str().to_string(),
            value,
        })
        .collect();

    let length_dist = LENGTH_BUCKETS
        .iter()
        .zip(length_counts)
        .map(|((label, _), count)| LengthBucket {
            range: (*label).to_string(),
            count,
        })
        .collect();

    let inactive_days = match table.date_range() {
        Some((first, last)) => date_span(first, last)
            .filter(|day| !active.contains(day))
            .collect(),
        None => Vec::new(),
    };

    ContentView {
        types,
        length_dist,
        emojis: emoji_tally
            .top(config.top_n)
            .into_iter()
            .map(|(emoji, count)| EmojiCount { emoji, count })
            .collect(),
        top_words: word_tally
            .top(config.top_n)
            .into_iter()
            .map(|(word, count)| WordCount { word, count })
            .collect(),
        inactive_days,
    }
}
