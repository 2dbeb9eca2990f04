//! CSV report writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, StatsError};
use crate::format::StatsReport;

/// Writes one CSV table per series into `dir`, creating it if needed.
///
/// # Files
/// - `summary.csv` - one row of headline totals
/// - `timeline.csv`, `hourly.csv`, `weekday.csv` - activity series
/// - `users.csv` - per-sender rows
/// - `content_types.csv`, `length_distribution.csv`, `top_emojis.csv`,
///   `top_words.csv`, `inactive_days.csv` - content series
///
/// Only the views present in `report` produce files. Returns the paths
/// written, in the order above.
pub fn write_csv_dir(report: &StatsReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| StatsError::io_at(e, dir))?;
    let mut written = Vec::new();

    if let Some(summary) = &report.summary {
        written.push(write_rows(dir, "summary.csv", std::iter::once(summary))?);
    }

    if let Some(activity) = &report.activity {
        written.push(write_rows(dir, "timeline.csv", &activity.timeline)?);
        written.push(write_rows(dir, "hourly.csv", &activity.hourly)?);
        written.push(write_rows(dir, "weekday.csv", &activity.weekday)?);
    }

    if let Some(users) = &report.users {
        written.push(write_rows(dir, "users.csv", &users.rows)?);
    }

    if let Some(content) = &report.content {
        written.push(write_rows(dir, "content_types.csv", &content.types)?);
        written.push(write_rows(dir, "length_distribution.csv", &content.length_dist)?);
        written.push(write_rows(dir, "top_emojis.csv", &content.emojis)?);
        written.push(write_rows(dir, "top_words.csv", &content.top_words)?);

        let path = dir.join("inactive_days.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["date"])?;
        for day in &content.inactive_days {
            writer.write_record([day.to_string()])?;
        }
        writer.flush().map_err(|e| StatsError::io_at(e, &path))?;
        written.push(path);
    }

    Ok(written)
}

/// Writes serializable rows with a header taken from the field names.
fn write_rows<'a, T, I>(dir: &Path, name: &str, rows: I) -> Result<PathBuf>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| StatsError::io_at(e, &path))?;
    Ok(path)
}
