//! Property-based tests for tgstats.
//!
//! These tests generate random message histories and check that the views
//! stay consistent with each other and with the message table.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use proptest::prelude::*;

use tgstats::config::{ParserConfig, StatsConfig};
use tgstats::core::{MessageTable, merge_exports};
use tgstats::parsing::{ParsedExport, parse_export};
use tgstats::stats;
use tgstats::{ContentType, Message, MessageId};

fn base() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
        .unwrap()
}

/// One generated message before ids and timestamps are assigned.
#[derive(Debug, Clone)]
struct Draft {
    sender: String,
    text: String,
    gap_minutes: i64,
    content_type: ContentType,
    reply_back: Option<usize>,
}

fn arb_draft() -> impl Strategy<Value = Draft> {
    (
        prop::sample::select(vec![
            "Alice".to_string(),
            "Bob".to_string(),
            "Charlie".to_string(),
            "Иван".to_string(),
            "村上".to_string(),
        ]),
        prop::sample::select(vec![
            "hello".to_string(),
            "Good morning everyone".to_string(),
            "coffee later?".to_string(),
            "Привет мир".to_string(),
            "🎉🔥 party".to_string(),
            "👍🏽".to_string(),
            "a much longer message that talks about the weather and the weekend plans in some detail"
                .to_string(),
            String::new(),
        ]),
        // Up to four days between messages so timelines get gaps.
        1i64..(4 * 24 * 60),
        prop::sample::select(ContentType::all().to_vec()),
        prop::option::of(1usize..5),
    )
        .prop_map(|(sender, text, gap_minutes, content_type, reply_back)| Draft {
            sender,
            text,
            gap_minutes,
            content_type,
            reply_back,
        })
}

/// Messages with unique ids and strictly increasing timestamps.
fn realize(drafts: &[Draft]) -> Vec<Message> {
    let mut ts = base();
    drafts
        .iter()
        .enumerate()
        .map(|(i, d)| {
            ts += Duration::minutes(d.gap_minutes);
            let id = i as i64 + 1;
            let mut msg = Message::new(MessageId(id), ts, d.sender.clone(), d.text.clone())
                .with_content_type(d.content_type);
            if let Some(back) = d.reply_back {
                msg = msg.with_reply_to(MessageId(id - back as i64));
            }
            msg
        })
        .collect()
}

fn arb_messages(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_draft(), 1..max_len).prop_map(|d| realize(&d))
}

fn export(name: &str, messages: Vec<Message>) -> ParsedExport {
    ParsedExport {
        filename: name.to_string(),
        messages,
        skipped_blocks: 0,
    }
}

fn ids(table: &MessageTable) -> Vec<i64> {
    table.iter().map(|m| m.id.0).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // VIEW CONSISTENCY
    // ============================================

    /// Summary totals match the table
    #[test]
    fn summary_matches_table(messages in arb_messages(60)) {
        let table = MessageTable::new(messages);
        let summary = stats::summary(&table);

        prop_assert_eq!(summary.total_messages, table.len());
        prop_assert_eq!(summary.total_users, table.sender_count());
        prop_assert!(summary.peak_activity_date.is_some());
        prop_assert!(summary.peak_message_count >= 1);
    }

    /// Per-user counts partition the table and contributions add to 100
    #[test]
    fn users_partition_messages(messages in arb_messages(60)) {
        let table = MessageTable::new(messages);
        let users = stats::users(&table, &StatsConfig::default());

        let total: usize = users.rows.iter().map(|r| r.messages).sum();
        prop_assert_eq!(total, table.len());

        let contribution: f64 = users.rows.iter().map(|r| r.contribution).sum();
        prop_assert!((contribution - 100.0).abs() <= 0.1, "sum was {}", contribution);

        for (rank, pair) in users.rows.windows(2).enumerate() {
            prop_assert!(pair[0].messages >= pair[1].messages);
            prop_assert_eq!(pair[0].id, rank + 1);
        }
    }

    /// The timeline covers every day of the span exactly once
    #[test]
    fn timeline_is_gapless(messages in arb_messages(60)) {
        let table = MessageTable::new(messages);
        let activity = stats::activity(&table);
        let (first, last) = table.date_range().unwrap();

        let span = (last - first).num_days() as usize + 1;
        prop_assert_eq!(activity.timeline.len(), span);
        prop_assert_eq!(activity.timeline.first().map(|p| p.date), Some(first));
        prop_assert_eq!(activity.timeline.last().map(|p| p.date), Some(last));
        for pair in activity.timeline.windows(2) {
            prop_assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }

        let total: usize = activity.timeline.iter().map(|p| p.messages).sum();
        prop_assert_eq!(total, table.len());
    }

    /// Histograms have fixed lengths and sum to the table size
    #[test]
    fn histograms_sum_to_total(messages in arb_messages(60)) {
        let table = MessageTable::new(messages);
        let activity = stats::activity(&table);
        let content = stats::content(&table, &StatsConfig::default());

        prop_assert_eq!(activity.hourly.len(), 24);
        prop_assert_eq!(activity.weekday.len(), 7);
        prop_assert_eq!(content.types.len(), ContentType::all().len());

        prop_assert_eq!(activity.hourly.iter().map(|h| h.count).sum::<usize>(), table.len());
        prop_assert_eq!(activity.weekday.iter().map(|w| w.count).sum::<usize>(), table.len());
        prop_assert_eq!(content.types.iter().map(|t| t.value).sum::<usize>(), table.len());
        prop_assert_eq!(content.length_dist.iter().map(|b| b.count).sum::<usize>(), table.len());
    }

    /// Active and inactive days together make up the timeline
    #[test]
    fn active_plus_inactive_days_is_span(messages in arb_messages(60)) {
        let table = MessageTable::new(messages);
        let summary = stats::summary(&table);
        let activity = stats::activity(&table);
        let content = stats::content(&table, &StatsConfig::default());

        prop_assert_eq!(
            summary.active_days + content.inactive_days.len(),
            activity.timeline.len()
        );
        let peak = activity.timeline.iter().map(|p| p.messages).max().unwrap_or(0);
        prop_assert_eq!(summary.peak_message_count, peak);
    }

    /// Rankings never exceed top_n and are sorted by count
    #[test]
    fn rankings_respect_top_n(messages in arb_messages(60), top_n in 1usize..6) {
        let table = MessageTable::new(messages);
        let content = stats::content(&table, &StatsConfig::new().with_top_n(top_n));

        prop_assert!(content.emojis.len() <= top_n);
        prop_assert!(content.top_words.len() <= top_n);
        for pair in content.top_words.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
    }

    // ============================================
    // MERGE PROPERTIES
    // ============================================

    /// Upload order of non-overlapping parts does not matter
    #[test]
    fn merge_is_order_independent(messages in arb_messages(40), split in 0usize..40) {
        let split = split.min(messages.len());
        let (head, tail) = messages.split_at(split);

        let forward = merge_exports(vec![
            export("messages.html", head.to_vec()),
            export("messages2.html", tail.to_vec()),
        ]).unwrap();
        let backward = merge_exports(vec![
            export("messages2.html", tail.to_vec()),
            export("messages.html", head.to_vec()),
        ]).unwrap();

        prop_assert_eq!(ids(&forward.table), ids(&backward.table));
        prop_assert_eq!(forward.table.len(), messages.len());
        prop_assert_eq!(forward.duplicates_dropped, 0);
    }

    /// Merging a file with itself adds nothing
    #[test]
    fn merge_dedup_is_idempotent(messages in arb_messages(40)) {
        let once = merge_exports(vec![export("messages.html", messages.clone())]).unwrap();
        let twice = merge_exports(vec![
            export("messages.html", messages.clone()),
            export("messages.html", messages.clone()),
        ]).unwrap();

        prop_assert_eq!(ids(&once.table), ids(&twice.table));
        prop_assert_eq!(twice.duplicates_dropped, messages.len());
        prop_assert_eq!(once.unresolved_replies, twice.unresolved_replies);
    }

    /// Table order is chronological
    #[test]
    fn table_is_sorted(mut messages in arb_messages(40)) {
        messages.reverse();
        let table = MessageTable::new(messages);
        for pair in table.messages().windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    // ============================================
    // PARSER PROPERTIES
    // ============================================

    /// Rendered text messages parse back with sender, text and order intact
    #[test]
    fn rendered_history_parses_back(drafts in prop::collection::vec(arb_draft(), 1..30)) {
        let messages: Vec<Message> = realize(&drafts)
            .into_iter()
            .filter(|m| !m.text.is_empty())
            .collect();
        prop_assume!(!messages.is_empty());

        let html = render(&messages);
        let parsed = parse_export(&html, "messages.html", &ParserConfig::default()).unwrap();

        prop_assert_eq!(parsed.skipped_blocks, 0);
        prop_assert_eq!(parsed.messages.len(), messages.len());
        for (original, back) in messages.iter().zip(&parsed.messages) {
            prop_assert_eq!(original.id, back.id);
            prop_assert_eq!(original.timestamp, back.timestamp);
            prop_assert_eq!(&original.sender, &back.sender);
            prop_assert_eq!(&original.text, &back.text);
            prop_assert_eq!(back.content_type, ContentType::Text);
        }
    }
}

/// Renders text messages as export markup, using `joined` blocks for
/// consecutive messages from one sender.
fn render(messages: &[Message]) -> String {
    let mut html = String::from("<html><body><div class=\"history\">\n");
    let mut last_sender: Option<&str> = None;

    for msg in messages {
        let joined = last_sender == Some(msg.sender.as_str());
        last_sender = Some(&msg.sender);

        html.push_str(&format!(
            "<div class=\"message default clearfix{}\" id=\"message{}\"><div class=\"body\">",
            if joined { " joined" } else { "" },
            msg.id.0
        ));
        html.push_str(&format!(
            "<div class=\"pull_right date details\" title=\"{}\">{}</div>",
            msg.timestamp.format("%d.%m.%Y %H:%M:%S UTC%:z"),
            msg.timestamp.format("%H:%M")
        ));
        if !joined {
            html.push_str(&format!("<div class=\"from_name\">{}</div>", msg.sender));
        }
        html.push_str(&format!("<div class=\"text\">{}</div></div></div>\n", msg.text));
    }

    html.push_str("</div></body></html>\n");
    html
}
