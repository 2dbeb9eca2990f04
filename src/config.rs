//! Configuration types for parsing, aggregation and ingest.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. Every struct implements
//! `Serialize`/`Deserialize` with `#[serde(default)]`, so a partial JSON file
//! only overrides the fields it names.
//!
//! - [`ParserConfig`] - Export parser settings (default UTC offset, sender aliases)
//! - [`StatsConfig`] - Aggregation settings (top-N, stoplist, conversation gap)
//! - [`IngestConfig`] - Upload limits plus the two configs above
//!
//! # Example
//!
//! ```rust
//! use tgstats::config::{IngestConfig, StatsConfig};
//!
//! let config = IngestConfig::new()
//!     .with_max_upload_bytes(10 * 1024 * 1024)
//!     .with_stats(StatsConfig::new().with_top_n(10));
//!
//! assert!(config.validate().is_ok());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, StatsError};

/// Default aggregate upload cap (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Default length of top-N lists.
pub const DEFAULT_TOP_N: usize = 20;

const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Words excluded from "top words" by default.
///
/// English and Russian articles, pronouns and particles.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "an", "to", "is", "it", "of", "for", "in", "on", "that", "and", "or", "but",
    "you", "me", "i", "my", "we", "our", "he", "she", "they", "them", "his", "her", "this",
    "was", "are", "be", "ya", "и", "в", "во", "не", "на", "я", "что", "он", "она", "оно", "они",
    "с", "со", "как", "а", "то", "это", "по", "но", "ты", "мы", "вы", "у", "же", "да", "так",
    "к", "за", "из", "от",
];

/// Configuration for the HTML export parser.
///
/// # Example
///
/// ```rust
/// use tgstats::config::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_utc_offset_minutes(180)
///     .with_alias("maksat", "Maxat");
///
/// assert_eq!(config.canonical_sender("Maksat Bekov"), "Maxat");
/// assert_eq!(config.canonical_sender("Alice"), "Alice");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Offset applied to timestamps that carry no `UTC±hh:mm` suffix
    /// (default: 0, i.e. UTC)
    pub utc_offset_minutes: i32,

    /// Display-name aliases, keyed by lowercase full name or first word
    /// (default: empty)
    pub sender_aliases: BTreeMap<String, String>,
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback UTC offset in minutes.
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Adds a sender alias. The key is matched case-insensitively.
    #[must_use]
    pub fn with_alias(mut self, name: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.sender_aliases
            .insert(name.into().to_lowercase(), canonical.into());
        self
    }

    /// Returns the fallback offset, clamped to UTC when out of range.
    pub fn default_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Maps a display name through the alias table.
    ///
    /// The full lowercase name is tried first, then its first word. Names
    /// without an alias are returned trimmed but otherwise unchanged.
    pub fn canonical_sender(&self, name: &str) -> String {
        let trimmed = name.trim();
        if self.sender_aliases.is_empty() {
            return trimmed.to_string();
        }

        let lowered = trimmed.to_lowercase();
        if let Some(alias) = self.sender_aliases.get(&lowered) {
            return alias.clone();
        }

        lowered
            .split_whitespace()
            .next()
            .and_then(|first| self.sender_aliases.get(first))
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }
}

/// Configuration for the aggregation views.
///
/// # Example
///
/// ```rust
/// use tgstats::config::StatsConfig;
///
/// let config = StatsConfig::new()
///     .with_top_n(5)
///     .with_stopwords(["lol", "ok"]);
///
/// assert!(config.is_stopword("LOL"));
/// assert!(!config.is_stopword("the"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Length of the emoji and word rankings (default: 20)
    pub top_n: usize,

    /// Lowercase tokens excluded from the word ranking
    /// (default: [`DEFAULT_STOPWORDS`])
    #[serde(deserialize_with = "lowercase_set")]
    pub stopwords: BTreeSet<String>,

    /// Shorter tokens are excluded from the word ranking (default: 3)
    pub min_word_length: usize,

    /// Silence after which a message counts as a conversation starter
    /// (default: 6 hours)
    pub starter_gap_hours: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| (*s).to_string()).collect(),
            min_word_length: 3,
            starter_gap_hours: 6,
        }
    }
}

impl StatsConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length of top-N rankings.
    #[must_use]
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Replaces the stoplist.
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        self
    }

    /// Sets the minimum ranked word length.
    #[must_use]
    pub fn with_min_word_length(mut self, len: usize) -> Self {
        self.min_word_length = len;
        self
    }

    /// Sets the conversation-starter gap.
    #[must_use]
    pub fn with_starter_gap_hours(mut self, hours: u32) -> Self {
        self.starter_gap_hours = hours;
        self
    }

    /// Returns `true` if `word` is on the stoplist (case-insensitive).
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }
}

fn lowercase_set<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let words = Vec::<String>::deserialize(deserializer)?;
    Ok(words.iter().map(|w| w.to_lowercase()).collect())
}

/// Configuration for one ingest call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Aggregate byte cap for one upload batch (default: 50 MiB)
    pub max_upload_bytes: u64,

    /// Report malformed files as rejected instead of failing the batch
    /// (default: false)
    pub skip_malformed_files: bool,

    /// Export parser settings
    pub parser: ParserConfig,

    /// Aggregation settings
    pub stats: StatsConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            skip_malformed_files: false,
            parser: ParserConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StatsError::io_at(e, path))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the upload cap.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Sets whether malformed files are skipped.
    #[must_use]
    pub fn with_skip_malformed_files(mut self, skip: bool) -> Self {
        self.skip_malformed_files = skip;
        self
    }

    /// Replaces the parser settings.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the aggregation settings.
    #[must_use]
    pub fn with_stats(mut self, stats: StatsConfig) -> Self {
        self.stats = stats;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(StatsError::invalid_config("max_upload_bytes must be positive"));
        }
        if self.stats.top_n == 0 {
            return Err(StatsError::invalid_config("top_n must be positive"));
        }
        if self.parser.utc_offset_minutes.abs() >= MAX_OFFSET_MINUTES {
            return Err(StatsError::invalid_config(format!(
                "utc_offset_minutes {} is outside ±{}",
                self.parser.utc_offset_minutes, MAX_OFFSET_MINUTES
            )));
        }
        Ok(())
    }
}
