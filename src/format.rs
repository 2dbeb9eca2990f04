//! View selection and report assembly.
//!
//! This module provides library-first types for picking which views to
//! render, independent of any CLI framework.
//!
//! # Example
//!
//! ```rust
//! use tgstats::format::View;
//! use std::str::FromStr;
//!
//! let view = View::from_str("users").unwrap();
//! assert_eq!(view, View::Users);
//! assert!(View::All.includes(View::Content));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::StatsEngine;
use crate::stats::{self, ActivityView, ContentView, SummaryView, UsersView};

/// Which view (or all of them) to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum View {
    /// Headline totals
    Summary,
    /// Timeline, hourly and weekday histograms
    Activity,
    /// Per-sender rows
    Users,
    /// Content mix and rankings
    Content,
    /// Every view, keyed by name
    #[default]
    All,
}

impl View {
    /// Lowercase name as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            View::Summary => "summary",
            View::Activity => "activity",
            View::Users => "users",
            View::Content => "content",
            View::All => "all",
        }
    }

    /// Returns all view names.
    pub fn all_names() -> &'static [&'static str] {
        &["summary", "activity", "users", "content", "all"]
    }

    /// Returns `true` if rendering `self` includes `other`.
    pub fn includes(&self, other: View) -> bool {
        *self == View::All || *self == other
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(View::Summary),
            "activity" => Ok(View::Activity),
            "users" => Ok(View::Users),
            "content" => Ok(View::Content),
            "all" => Ok(View::All),
            _ => Err(format!(
                "Unknown view: '{}'. Expected one of: {}",
                s,
                View::all_names().join(", ")
            )),
        }
    }
}

/// The selected views, computed from one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsReport {
    /// Summary view, if selected
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<SummaryView>,
    /// Activity view, if selected
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub activity: Option<ActivityView>,
    /// Users view, if selected
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub users: Option<UsersView>,
    /// Content view, if selected
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<ContentView>,
}

impl StatsReport {
    /// Computes the selected views.
    ///
    /// All views read the same dataset even if an ingest lands meanwhile.
    pub fn collect(engine: &StatsEngine, view: View) -> Result<Self> {
        let dataset = engine.dataset()?;
        let table = &dataset.table;
        let config = &engine.config().stats;

        Ok(Self {
            summary: view.includes(View::Summary).then(|| stats::summary(table)),
            activity: view.includes(View::Activity).then(|| stats::activity(table)),
            users: view.includes(View::Users).then(|| stats::users(table, config)),
            content: view
                .includes(View::Content)
                .then(|| stats::content(table, config)),
        })
    }
}
