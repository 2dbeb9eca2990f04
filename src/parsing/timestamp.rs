//! Date and time parsing for Telegram HTML exports.
//!
//! Telegram Desktop writes three kinds of date text:
//!
//! | Where | Example | Parsed by |
//! |-------|---------|-----------|
//! | `title` of `div.date.details` | `15.01.2024 10:30:00 UTC+03:00` | [`parse_title_timestamp`] |
//! | visible text of `div.date.details` | `10:30` | [`parse_time_of_day`] |
//! | day separator service block | `15 January 2024` | [`parse_day_divider`] |
//!
//! Older exports omit the `UTC±hh:mm` suffix, in which case the configured
//! default offset applies. Day separators follow the UI language, so English
//! and Russian month names are both recognized.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

const TITLE_FORMATS: &[&str] = &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

/// Month names as they appear in day separators, lowercase.
const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("января", 1),
    ("февраля", 2),
    ("марта", 3),
    ("апреля", 4),
    ("мая", 5),
    ("июня", 6),
    ("июля", 7),
    ("августа", 8),
    ("сентября", 9),
    ("октября", 10),
    ("ноября", 11),
    ("декабря", 12),
];

/// Parses the full timestamp from a date element's `title` attribute.
///
/// # Example
///
/// ```
/// use chrono::{FixedOffset, Timelike};
/// use tgstats::parsing::timestamp::parse_title_timestamp;
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// let ts = parse_title_timestamp("15.01.2024 10:30:00 UTC+03:00", utc).unwrap();
/// assert_eq!(ts.offset().local_minus_utc(), 3 * 3600);
/// assert_eq!(ts.hour(), 10);
/// ```
pub fn parse_title_timestamp(title: &str, default: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let title = title.trim();
    let (local, offset) = match title.split_once(" UTC") {
        Some((local, suffix)) => (local.trim(), parse_utc_suffix(suffix.trim())?),
        None => (title, default),
    };

    TITLE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

/// Parses `+03:00`, `-05:30` or `+0300`. An empty suffix means UTC.
fn parse_utc_suffix(suffix: &str) -> Option<FixedOffset> {
    if suffix.is_empty() {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match suffix.as_bytes().first()? {
        b'+' => (1, &suffix[1..]),
        b'-' => (-1, &suffix[1..]),
        _ => return None,
    };

    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses a visible time-of-day label such as `10:30`.
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

/// Parses a day separator such as `15 January 2024` or `15 января 2024 г.`.
///
/// Returns `None` for any other text, which is how day separators are told
/// apart from ordinary service messages.
pub fn parse_day_divider(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month_name = parts.next()?.to_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;

    match parts.next() {
        None => {}
        Some(tail) if tail == "г." || tail == "г" => {}
        Some(_) => return None,
    }

    let month = MONTHS
        .iter()
        .find(|(name, _)| *name == month_name)
        .map(|(_, m)| *m)?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Combines a day context with a time-of-day label.
pub fn combine(day: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&day.and_time(time)).single()
}
