//! Tests for report writers (JSON, CSV)

use std::fs;

use serde_json::Value;
use tempfile::tempdir;
use tgstats::prelude::*;

const EXPORT: &str = r##"<div class="history">
<div class="message default clearfix" id="message1"><div class="body">
<div class="pull_right date details" title="15.01.2024 10:30:00 UTC+03:00">10:30</div>
<div class="from_name">Smith, &quot;Agent&quot;</div><div class="text">Привет! 🎉 meeting</div></div></div>
<div class="message default clearfix" id="message2"><div class="body">
<div class="pull_right date details" title="16.01.2024 11:00:00 UTC+03:00">11:00</div>
<div class="from_name">Bob</div>
<div class="reply_to details">In reply to <a href="#go_to_message1">this message</a></div>
<div class="text">meeting moved</div></div></div>
</div>"##;

fn engine() -> StatsEngine {
    let engine = StatsEngine::new();
    engine
        .ingest(vec![UploadedFile::new("messages.html", EXPORT)])
        .unwrap();
    engine
}

fn report(view: View) -> StatsReport {
    StatsReport::collect(&engine(), view).unwrap()
}

// ============================================================================
// JSON Writer Tests
// ============================================================================

mod json_writer_tests {
    use super::*;

    #[test]
    fn test_write_json_all_views() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");

        write_json(&report(View::All), View::All, &path).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(json["summary"]["totalMessages"], 2);
        assert_eq!(json["users"][0]["name"], "Bob");
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = to_json(&report(View::Users), View::Users).unwrap();
        assert!(json.contains("\"avgWords\""));
        assert!(json.contains("\"contribution\""));
        assert!(!json.contains("avg_words"));

        let json = to_json(&report(View::Content), View::Content).unwrap();
        assert!(json.contains("\"lengthDist\""));
        assert!(json.contains("\"topWords\""));
        assert!(json.contains("\"inactiveDays\""));
    }

    #[test]
    fn test_json_keeps_unicode() {
        let json = to_json(&report(View::Content), View::Content).unwrap();
        assert!(json.contains("🎉"));
        assert!(json.contains("привет"));
    }

    #[test]
    fn test_json_views_round_trip() {
        let original = report(View::All);
        let json = to_json(&original, View::All).unwrap();
        let back: StatsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_write_json_bad_path() {
        let err = write_json(
            &report(View::Summary),
            View::Summary,
            std::path::Path::new("/nonexistent/dir/stats.json"),
        )
        .unwrap_err();
        assert!(err.is_io());
    }
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

mod csv_writer_tests {
    use super::*;

    #[test]
    fn test_csv_escapes_names() {
        let dir = tempdir().unwrap();
        write_csv_dir(&report(View::Users), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("users.csv")).unwrap();
        let names: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert!(names.contains(&"Smith, \"Agent\"".to_string()));
    }

    #[test]
    fn test_csv_timeline_is_gapless() {
        let dir = tempdir().unwrap();
        write_csv_dir(&report(View::Activity), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("timeline.csv")).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, ["date", "messages"]);
        let rows: Vec<(String, String)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string())
            })
            .collect();
        assert_eq!(
            rows,
            [
                ("2024-01-15".to_string(), "1".to_string()),
                ("2024-01-16".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_csv_weekday_order() {
        let dir = tempdir().unwrap();
        write_csv_dir(&report(View::Activity), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("weekday.csv")).unwrap();
        let days: Vec<String> = reader.records().map(|r| r.unwrap()[0].to_string()).collect();
        assert_eq!(days, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn test_csv_dir_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let written = write_csv_dir(&report(View::Summary), &nested).unwrap();
        assert_eq!(written, [nested.join("summary.csv")]);
        assert!(nested.join("summary.csv").exists());
    }
}
