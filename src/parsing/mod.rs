//! Parsing of Telegram Desktop HTML exports.
//!
//! - [`html`] - Block classification and message extraction
//! - [`timestamp`] - Date and time text found in exports
//! - [`text`] - Word and emoji tokenization shared with the aggregation views

pub mod html;
pub mod text;
pub mod timestamp;

pub use html::{Block, HtmlExportParser, ParsedExport, SkipReason, parse_export};
pub use text::{count_words, emojis, words};
