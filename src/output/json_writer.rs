//! JSON report writer.

use std::fs;
use std::path::Path;

use crate::error::{Result, StatsError};
use crate::format::{StatsReport, View};

/// Renders the report as pretty JSON.
///
/// A single view renders as that view's own object (or array, for users),
/// the same shape the query endpoints return. [`View::All`] renders an object
/// keyed by view name.
pub fn to_json(report: &StatsReport, view: View) -> Result<String> {
    let json = match view {
        View::Summary => serde_json::to_string_pretty(&report.summary)?,
        View::Activity => serde_json::to_string_pretty(&report.activity)?,
        View::Users => serde_json::to_string_pretty(&report.users)?,
        View::Content => serde_json::to_string_pretty(&report.content)?,
        View::All => serde_json::to_string_pretty(report)?,
    };
    Ok(json)
}

/// Writes the report as pretty JSON to `path`.
pub fn write_json(report: &StatsReport, view: View, path: &Path) -> Result<()> {
    let mut json = to_json(report, view)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| StatsError::io_at(e, path))
}
