//! # tgstats
//!
//! Aggregate analytics for Telegram Desktop HTML chat exports.
//!
//! ## Overview
//!
//! Telegram Desktop's "Export chat history" writes a chat as one or more HTML
//! files (`messages.html`, `messages2.html`, ...). tgstats parses those
//! files into a normalized message table and derives four read-only views:
//!
//! - **Summary** - total messages and users, active days, the busiest day
//! - **Activity** - daily timeline, hour-of-day and weekday histograms
//! - **Users** - messages, replies, contribution and conversation starters per sender
//! - **Content** - content-type mix, message lengths, top emojis and words
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tgstats::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let engine = StatsEngine::new();
//!
//!     // Ingest every messages*.html part of an export directory
//!     let report = engine.ingest_paths(&["ChatExport_2024-01-15"])?;
//!     println!("{}", report.message);
//!
//!     // Query the views
//!     let summary = engine.summary()?;
//!     println!("{} messages from {} users", summary.total_messages, summary.total_users);
//!
//!     for user in engine.users()?.rows {
//!         println!("{}: {} ({}%)", user.name, user.messages, user.contribution);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Uploads
//!
//! A transport layer hands over `(filename, bytes)` pairs:
//!
//! ```rust
//! use tgstats::pipeline::{StatsEngine, UploadedFile};
//!
//! let engine = StatsEngine::new();
//! let err = engine.ingest(vec![UploadedFile::new("result.json", "{}")]).unwrap_err();
//! assert_eq!(err.to_response().kind, "UnsupportedFileError");
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`] - HTML export parser, timestamps, word and emoji tokenization
//! - [`core`] - Part merging, the [`MessageTable`](core::MessageTable), the
//!   [`DatasetStore`](core::DatasetStore)
//! - [`stats`] - The four views
//! - [`pipeline`] - [`StatsEngine`](pipeline::StatsEngine): ingest and queries
//! - [`format`] / [`output`] - View selection, JSON and CSV report writers
//! - [`config`] - Parser, aggregation and ingest configuration
//! - [`error`] - [`StatsError`] and [`Result`]
//! - [`cli`] - CLI types (requires `cli` feature)
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod output;
pub mod parsing;
pub mod pipeline;
pub mod stats;

// Re-export the main types at the crate root for convenience
pub use error::{ErrorResponse, Result, StatsError};
pub use message::{ContentType, Message, MessageId};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use tgstats::prelude::*;
/// ```
pub mod prelude {
    // Core message types
    pub use crate::{ContentType, Message, MessageId};

    // Error types
    pub use crate::error::{ErrorResponse, Result, StatsError};

    // Configuration
    pub use crate::config::{IngestConfig, ParserConfig, StatsConfig};

    // Parsing
    pub use crate::parsing::{HtmlExportParser, ParsedExport, parse_export};

    // Dataset
    pub use crate::core::{
        Dataset, DatasetStore, IngestDiagnostics, IngestWarning, MessageTable, merge_exports,
    };

    // Views
    pub use crate::stats::{ActivityView, ContentView, SummaryView, UserRow, UsersView};

    // Pipeline
    pub use crate::pipeline::{IngestReport, StatsEngine, UploadedFile};

    // Reports
    pub use crate::format::{StatsReport, View};
    #[cfg(feature = "csv-output")]
    pub use crate::output::write_csv_dir;
    pub use crate::output::{to_json, write_json};
}
