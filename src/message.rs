//! Normalized message type for parsed Telegram exports.
//!
//! This module provides [`Message`], one record per chat message found in an
//! export, together with its identifier type [`MessageId`] and the closed
//! [`ContentType`] classification.
//!
//! # Overview
//!
//! A message consists of:
//! - **Identity**: `id`, `timestamp`, `sender`
//! - **Payload**: `text`, `content_type`
//! - **Threading**: optional `reply_to`, resolved against the
//!   [`MessageTable`](crate::core::MessageTable) at query time
//! - **Derived**: `word_count`, `char_length`, computed once in [`Message::new`]
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use tgstats::{ContentType, Message, MessageId};
//!
//! let ts = FixedOffset::east_opt(0).unwrap()
//!     .with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
//!
//! let msg = Message::new(MessageId(1), ts, "Alice", "hello world")
//!     .with_reply_to(MessageId(0));
//!
//! assert_eq!(msg.word_count, 2);
//! assert_eq!(msg.content_type, ContentType::Text);
//! assert!(msg.is_reply());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::parsing::text::count_words;

/// Source-assigned message identifier.
///
/// Telegram numbers messages per chat; the HTML export encodes the number in
/// the block's `id="message123"` attribute. Service blocks may carry negative
/// numbers, so the identifier is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary payload kind of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain text
    #[default]
    Text,
    /// Photo or image
    Photo,
    /// Video, round video message or animation
    Video,
    /// Voice message
    Voice,
    /// Sticker
    Sticker,
    /// Document or audio file
    File,
    /// Join/leave/rename and other system actions
    Service,
    /// Locations, polls, contacts, games and anything unrecognized
    Other,
}

impl ContentType {
    /// All categories in presentation order.
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Text,
            ContentType::Photo,
            ContentType::Video,
            ContentType::Voice,
            ContentType::Sticker,
            ContentType::File,
            ContentType::Service,
            ContentType::Other,
        ]
    }

    /// Lowercase name used in JSON and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Photo => "photo",
            ContentType::Video => "video",
            ContentType::Voice => "voice",
            ContentType::Sticker => "sticker",
            ContentType::File => "file",
            ContentType::Service => "service",
            ContentType::Other => "other",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::all()
            .iter()
            .copied()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown content type: '{}'", s))
    }
}

/// A chat message parsed from a Telegram HTML export.
///
/// Messages are immutable once placed in a
/// [`MessageTable`](crate::core::MessageTable). The derived counters are
/// computed when the message is built so aggregations never re-tokenize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Source-assigned identifier, unique within one export.
    pub id: MessageId,

    /// When the message was sent, in the export's UTC offset.
    pub timestamp: DateTime<FixedOffset>,

    /// Display name of the author.
    pub sender: String,

    /// Plain text content with emoji preserved.
    pub text: String,

    /// Primary payload kind.
    pub content_type: ContentType,

    /// Identifier of the message this one replies to.
    ///
    /// Kept as a raw key. The target may live in another export part and is
    /// looked up through the table's id index.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reply_to: Option<MessageId>,

    /// Original author of a forwarded message.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub forwarded_from: Option<String>,

    /// Number of word tokens in `text`, stopwords included.
    pub word_count: usize,

    /// Number of Unicode scalar values in `text`.
    pub char_length: usize,
}

impl Message {
    /// Creates a text message and computes its derived counters.
    pub fn new(
        id: MessageId,
        timestamp: DateTime<FixedOffset>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        Self {
            id,
            timestamp,
            sender: sender.into(),
            word_count: count_words(&text),
            char_length: text.chars().count(),
            text,
            content_type: ContentType::Text,
            reply_to: None,
            forwarded_from: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Builder method to set the reply reference.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: MessageId) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Builder method to set the forwarded-from author.
    #[must_use]
    pub fn with_forwarded_from(mut self, author: impl Into<String>) -> Self {
        self.forwarded_from = Some(author.into());
        self
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Calendar date in the export's local time.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Hour of day (0-23) in the export's local time.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Returns `true` if this message carries a reply reference.
    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    /// Returns `true` for join/leave/rename style system messages.
    pub fn is_service(&self) -> bool {
        self.content_type == ContentType::Service
    }
}
