//! Activity over time.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::MessageTable;
use crate::stats::{daily_counts, date_span};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Messages on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Local calendar date
    pub date: NaiveDate,
    /// Messages on that date
    pub messages: usize,
}

/// Messages in one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// Hour, 0 to 23
    pub hour: u32,
    /// Display label, e.g. `"9:00"`
    pub label: String,
    /// Messages in that hour across all dates
    pub count: usize,
}

/// Messages on one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayPoint {
    /// Three-letter English name, `Mon` to `Sun`
    pub day: String,
    /// Messages on that weekday across all weeks
    pub count: usize,
}

/// Daily timeline plus hour-of-day and weekday histograms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    /// One entry per date from the first to the last message, zero-filled
    pub timeline: Vec<TimelinePoint>,
    /// Exactly 24 entries, hours 0 to 23
    pub hourly: Vec<HourlyPoint>,
    /// Exactly 7 entries, Monday first
    pub weekday: Vec<WeekdayPoint>,
}

/// Builds the activity view.
pub fn activity(table: &MessageTable) -> ActivityView {
    let daily = daily_counts(table);

    let timeline = match table.date_range() {
        Some((first, last)) => date_span(first, last)
            .map(|date| TimelinePoint {
                date,
                messages: daily.get(&date).copied().unwrap_or(0),
            })
            .collect(),
        None => Vec::new(),
    };

    let mut hours = [0usize; 24];
    let mut weekdays = [0usize; 7];
    for msg in table {
        hours[msg.hour() as usize] += 1;
        weekdays[msg.date().weekday().num_days_from_monday() as usize] += 1;
    }

    let hourly = (0u32..)
        .zip(hours)
        .map(|(hour, count)| HourlyPoint {
            hour,
            label: format!("{hour}:00"),
            count,
        })
        .collect();

    let weekday = WEEKDAY_LABELS
        .iter()
        .zip(weekdays)
        .map(|(day, count)| WeekdayPoint {
            day: (*day).to_string(),
            count,
        })
        .collect();

    ActivityView {
        timeline,
        hourly,
        weekday,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, MessageId};
    use chrono::{FixedOffset, TimeZone};

    fn msg(id: i64, day: u32, hour: u32) -> Message {
        let ts = FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, day, hour, 15, 0)
            .unwrap();
        Message::new(MessageId(id), ts, "Alice", "x")
    }

    #[test]
    fn test_timeline_zero_fills_gaps() {
        let table = MessageTable::new(vec![msg(1, 1, 9), msg(2, 4, 9), msg(3, 4, 10)]);
        let view = activity(&table);

        let counts: Vec<usize> = view.timeline.iter().map(|p| p.messages).collect();
        assert_eq!(counts, [1, 0, 0, 2]);
        assert_eq!(view.timeline[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(view.timeline[3].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_hourly_uses_local_time() {
        let table = MessageTable::new(vec![msg(1, 1, 0), msg(2, 1, 23), msg(3, 2, 23)]);
        let view = activity(&table);

        assert_eq!(view.hourly.len(), 24);
        assert_eq!(view.hourly[0].count, 1);
        assert_eq!(view.hourly[23].count, 2);
        assert_eq!(view.hourly[23].label, "23:00");
        assert_eq!(view.hourly[9].label, "9:00");
    }

    #[test]
    fn test_weekday_fixed_order() {
        // 2024-01-01 was a Monday, 2024-01-07 a Sunday.
        let table = MessageTable::new(vec![msg(1, 1, 9), msg(2, 7, 9), msg(3, 8, 9)]);
        let view = activity(&table);

        let days: Vec<&str> = view.weekday.iter().map(|w| w.day.as_str()).collect();
        assert_eq!(days, WEEKDAY_LABELS);
        assert_eq!(view.weekday[0].count, 2);
        assert_eq!(view.weekday[6].count, 1);
        assert_eq!(view.weekday[3].count, 0);
    }

    #[test]
    fn test_empty_table() {
        let view = activity(&MessageTable::default());
        assert!(view.timeline.is_empty());
        assert_eq!(view.hourly.len(), 24);
        assert_eq!(view.weekday.len(), 7);
    }
}
