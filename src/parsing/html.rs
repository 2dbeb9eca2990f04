//! Telegram Desktop HTML export parser.
//!
//! An export file is a `div.history` containing one `div.message` block per
//! chat event. Each block is classified into a [`Block`]:
//!
//! - `div.message.service` whose text is a date → [`Block::DateDivider`]
//! - `div.message.service` with any other text → a service [`Message`]
//! - `div.message.default` → a regular [`Message`]
//! - anything without a usable id or timestamp → [`Block::Skipped`]
//!
//! Regular blocks look like this (abridged):
//!
//! ```html
//! <div class="message default clearfix" id="message42">
//!   <div class="body">
//!     <div class="pull_right date details" title="15.01.2024 10:30:00 UTC+03:00">10:30</div>
//!     <div class="from_name">Alice</div>
//!     <div class="reply_to details">In reply to <a href="#go_to_message41">this message</a></div>
//!     <div class="media_wrap clearfix"><a class="photo_wrap clearfix pull_left" href="photos/1.jpg"></a></div>
//!     <div class="text">hello world</div>
//!   </div>
//! </div>
//! ```
//!
//! Consecutive messages from one author are marked `joined` and omit
//! `from_name`; the parser carries the previous sender forward. Forwarded
//! messages embed a nested `div.forwarded.body` with its own `from_name`,
//! which never becomes the block's sender.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace, warn};

use crate::config::ParserConfig;
use crate::error::{Result, StatsError};
use crate::message::{ContentType, Message, MessageId};
use crate::parsing::text::join_fragments;
use crate::parsing::timestamp::{
    combine, parse_day_divider, parse_time_of_day, parse_title_timestamp,
};

/// Sender used when neither the block nor its predecessors name one.
pub const UNKNOWN_SENDER: &str = "Unknown";

static HISTORY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.history").expect("selector is valid"));

static MESSAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.message").expect("selector is valid"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("selector is valid"));

static BLOCK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^message(-?\d+)$").expect("id pattern is valid"));

static REPLY_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:go_to_message|GoToMessage\(\s*)(-?\d+)").expect("reply pattern is valid")
});

/// Actor name followed by a system-action verb, e.g. `Alice Smith added Bob`.
static SERVICE_ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<actor>.+?)\s+(?:",
        r"created group|created channel|added|removed|left|joined|invited|",
        r"changed|pinned|converted|started|ended|scheduled|set|deleted|",
        r"создал|создала|добавил|добавила|удалил|удалила|покинул|покинула|",
        r"вступил|вступила|присоединился|присоединилась|изменил|изменила|",
        r"закрепил|закрепила|пригласил|пригласила",
        r")\b",
    ))
    .expect("service pattern is valid")
});

/// Media marker classes and the content type they imply, in priority order.
const MEDIA_MARKERS: &[(&str, ContentType)] = &[
    ("sticker_wrap", ContentType::Sticker),
    ("media_sticker", ContentType::Sticker),
    ("media_voice_message", ContentType::Voice),
    ("photo_wrap", ContentType::Photo),
    ("media_photo", ContentType::Photo),
    ("video_file_wrap", ContentType::Video),
    ("animated_wrap", ContentType::Video),
    ("media_video", ContentType::Video),
    ("media_audio_file", ContentType::File),
    ("media_file", ContentType::File),
    ("media_location", ContentType::Other),
    ("media_live_location", ContentType::Other),
    ("media_poll", ContentType::Other),
    ("media_contact", ContentType::Other),
    ("media_game", ContentType::Other),
    ("media_invoice", ContentType::Other),
];

/// Subtrees that never supply the block's own sender or date.
const DECORATION_CLASSES: &[&str] = &["forwarded", "reply_to"];

/// Why a message block produced no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The block has no `id="messageNNN"` attribute.
    MissingId,
    /// Neither a `title` timestamp nor a time label with a day context.
    MissingTimestamp,
}

/// Classification of one `div.message` block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A chat message.
    Message(Message),
    /// A day separator that sets the day context for following blocks.
    DateDivider(NaiveDate),
    /// A block that could not be turned into a message.
    Skipped(SkipReason),
}

/// Result of parsing one export file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExport {
    /// Declared name of the file.
    pub filename: String,
    /// Messages in document order.
    pub messages: Vec<Message>,
    /// Number of blocks that produced no message and were not day separators.
    pub skipped_blocks: usize,
}

impl ParsedExport {
    /// Earliest and latest message timestamps of this file.
    pub fn range(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let first = self.messages.iter().map(|m| m.timestamp).min()?;
        let last = self.messages.iter().map(|m| m.timestamp).max()?;
        Some((first, last))
    }

    /// Returns `true` if the two files' ranges share at least one instant.
    pub fn overlaps(&self, other: &ParsedExport) -> bool {
        match (self.range(), other.range()) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => {
                a_start <= b_end && b_start <= a_end
            }
            _ => false,
        }
    }
}

/// Running state threaded through the blocks of one file.
struct BlockContext<'a> {
    config: &'a ParserConfig,
    offset: FixedOffset,
    day: Option<NaiveDate>,
    last_sender: Option<String>,
    last_timestamp: Option<DateTime<FixedOffset>>,
}

/// Parser for Telegram Desktop HTML exports.
///
/// # Example
///
/// ```
/// use tgstats::parsing::html::HtmlExportParser;
///
/// let html = r#"<div class="history">
///   <div class="message default clearfix" id="message1">
///     <div class="body">
///       <div class="pull_right date details" title="15.01.2024 10:30:00">10:30</div>
///       <div class="from_name">Alice</div>
///       <div class="text">hello world</div>
///     </div>
///   </div>
/// </div>"#;
///
/// let export = HtmlExportParser::new().parse_str(html, "messages.html")?;
/// assert_eq!(export.messages.len(), 1);
/// assert_eq!(export.messages[0].sender, "Alice");
/// # Ok::<(), tgstats::StatsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlExportParser {
    config: ParserConfig,
}

impl HtmlExportParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one export file's markup.
    ///
    /// Fails with [`StatsError::MalformedExport`] when the document has
    /// neither a `div.history` container nor any `div.message` block.
    /// Individual unusable blocks are skipped and counted.
    pub fn parse_str(&self, content: &str, filename: &str) -> Result<ParsedExport> {
        let document = Html::parse_document(content);

        let has_history = document.select(&HISTORY_SELECTOR).next().is_some();
        let mut blocks = document.select(&MESSAGE_SELECTOR).peekable();
        if !has_history && blocks.peek().is_none() {
            return Err(StatsError::malformed(
                filename,
                "no div.history container and no div.message blocks",
            ));
        }

        let mut ctx = BlockContext {
            config: &self.config,
            offset: self.config.default_offset(),
            day: None,
            last_sender: None,
            last_timestamp: None,
        };

        let mut messages = Vec::new();
        let mut skipped_blocks = 0;

        for element in blocks {
            match classify_block(element, &ctx) {
                Block::Message(msg) => {
                    ctx.last_timestamp = Some(msg.timestamp);
                    ctx.day = Some(msg.date());
                    if !msg.is_service() {
                        ctx.last_sender = Some(msg.sender.clone());
                    }
                    messages.push(msg);
                }
                Block::DateDivider(day) => {
                    trace!(file = filename, %day, "day separator");
                    ctx.day = Some(day);
                }
                Block::Skipped(reason) => {
                    trace!(file = filename, ?reason, "skipped block");
                    skipped_blocks += 1;
                }
            }
        }

        if skipped_blocks > 0 {
            warn!(
                file = filename,
                skipped = skipped_blocks,
                "some message blocks could not be parsed"
            );
        }
        debug!(
            file = filename,
            messages = messages.len(),
            "parsed export file"
        );

        Ok(ParsedExport {
            filename: filename.to_string(),
            messages,
            skipped_blocks,
        })
    }
}

/// Parses one export file with the given configuration.
pub fn parse_export(content: &str, filename: &str, config: &ParserConfig) -> Result<ParsedExport> {
    HtmlExportParser::with_config(config.clone()).parse_str(content, filename)
}

fn classify_block(element: ElementRef<'_>, ctx: &BlockContext<'_>) -> Block {
    if has_class(element, "service") {
        classify_service_block(element, ctx)
    } else {
        classify_default_block(element, ctx)
    }
}

fn classify_service_block(element: ElementRef<'_>, ctx: &BlockContext<'_>) -> Block {
    let text = join_fragments(element.text());

    if let Some(day) = parse_day_divider(&text) {
        return Block::DateDivider(day);
    }

    let Some(id) = block_id(element) else {
        return Block::Skipped(SkipReason::MissingId);
    };

    // Service blocks carry no date element of their own.
    let timestamp = match own_timestamp(element, ctx).or_else(|| fallback_timestamp(ctx)) {
        Some(ts) => ts,
        None => return Block::Skipped(SkipReason::MissingTimestamp),
    };

    let sender = service_actor(&text)
        .map(str::to_string)
        .or_else(|| ctx.last_sender.clone())
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    Block::Message(
        Message::new(id, timestamp, ctx.config.canonical_sender(&sender), text)
            .with_content_type(ContentType::Service),
    )
}

fn classify_default_block(element: ElementRef<'_>, ctx: &BlockContext<'_>) -> Block {
    let Some(id) = block_id(element) else {
        return Block::Skipped(SkipReason::MissingId);
    };

    let Some(timestamp) = own_timestamp(element, ctx) else {
        return Block::Skipped(SkipReason::MissingTimestamp);
    };

    let sender = find_class(element, "from_name", DECORATION_CLASSES)
        .map(sender_name)
        .filter(|name| !name.is_empty())
        .map(|name| ctx.config.canonical_sender(&name))
        .or_else(|| ctx.last_sender.clone())
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    let text = find_class(element, "text", &["reply_to"])
        .map(|el| join_fragments(el.text()))
        .unwrap_or_default();

    let content_type = match media_type(element) {
        Some(media) => media,
        None if !text.is_empty() => ContentType::Text,
        None if is_service_phrase(&join_fragments(element.text())) => ContentType::Service,
        None => ContentType::Other,
    };

    let mut msg = Message::new(id, timestamp, sender, text).with_content_type(content_type);

    if let Some(reply_to) = find_class(element, "reply_to", &["forwarded"]).and_then(reply_target)
    {
        msg = msg.with_reply_to(reply_to);
    }

    if let Some(author) = find_class(element, "forwarded", &[])
        .and_then(|fwd| find_class(fwd, "from_name", &[]))
        .map(sender_name)
        .filter(|name| !name.is_empty())
    {
        msg = msg.with_forwarded_from(author);
    }

    Block::Message(msg)
}

/// Extracts the numeric id from `id="message123"`.
fn block_id(element: ElementRef<'_>) -> Option<MessageId> {
    let raw = element.value().attr("id")?;
    let caps = BLOCK_ID_RE.captures(raw.trim())?;
    caps[1].parse().ok().map(MessageId)
}

/// Timestamp from the block's own date element.
///
/// The `title` attribute is authoritative; the visible time label is only
/// used together with the current day context.
fn own_timestamp(element: ElementRef<'_>, ctx: &BlockContext<'_>) -> Option<DateTime<FixedOffset>> {
    let date_el = find_date_element(element)?;

    if let Some(ts) = date_el
        .value()
        .attr("title")
        .and_then(|title| parse_title_timestamp(title, ctx.offset))
    {
        return Some(ts);
    }

    let time = parse_time_of_day(&join_fragments(date_el.text()))?;
    combine(ctx.day?, time, ctx.offset)
}

/// Timestamp for blocks without a date element: the previous message's
/// instant, or midnight of a newer day separator.
fn fallback_timestamp(ctx: &BlockContext<'_>) -> Option<DateTime<FixedOffset>> {
    match (ctx.last_timestamp, ctx.day) {
        (Some(last), Some(day)) if day > last.date_naive() => {
            combine(day, NaiveTime::MIN, ctx.offset)
        }
        (Some(last), _) => Some(last),
        (None, Some(day)) => combine(day, NaiveTime::MIN, ctx.offset),
        (None, None) => None,
    }
}

fn find_date_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    find_matching(element, DECORATION_CLASSES, &|el| {
        has_class(el, "date") && has_class(el, "details")
    })
}

/// Display name from a `from_name` element, without the `via @bot` suffix
/// or the forwarded-message date.
fn sender_name(element: ElementRef<'_>) -> String {
    let own_text = element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t));
    let name = join_fragments(own_text);
    match name.split_once(" via @") {
        Some((head, _)) => head.trim().to_string(),
        None => name,
    }
}

fn reply_target(reply: ElementRef<'_>) -> Option<MessageId> {
    reply.select(&ANCHOR_SELECTOR).find_map(|anchor| {
        let attrs = anchor.value();
        let candidate = format!(
            "{} {}",
            attrs.attr("href").unwrap_or_default(),
            attrs.attr("onclick").unwrap_or_default()
        );
        REPLY_TARGET_RE
            .captures(&candidate)
            .and_then(|caps| caps[1].parse().ok())
            .map(MessageId)
    })
}

fn media_type(element: ElementRef<'_>) -> Option<ContentType> {
    MEDIA_MARKERS.iter().find_map(|(marker, content_type)| {
        find_class(element, marker, &["reply_to"]).map(|_| *content_type)
    })
}

/// Actor named before a system-action verb.
pub fn service_actor(text: &str) -> Option<&str> {
    SERVICE_ACTION_RE
        .captures(text)
        .and_then(|caps| caps.name("actor"))
        .map(|m| m.as_str().trim())
        .filter(|actor| !actor.is_empty())
}

/// Returns `true` if the text reads like a system action.
pub fn is_service_phrase(text: &str) -> bool {
    SERVICE_ACTION_RE.is_match(text)
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// First descendant carrying `class`, not descending into `skip` subtrees.
fn find_class<'a>(root: ElementRef<'a>, class: &str, skip: &[&str]) -> Option<ElementRef<'a>> {
    find_matching(root, skip, &|el| has_class(el, class))
}

fn find_matching<'a>(
    root: ElementRef<'a>,
    skip: &[&str],
    predicate: &dyn Fn(ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    for child in root.children() {
        let Some(el) = ElementRef::wrap(child) else {
            continue;
        };
        if skip.iter().any(|class| has_class(el, class)) {
            continue;
        }
        if predicate(el) {
            return Some(el);
        }
        if let Some(found) = find_matching(el, skip, predicate) {
            return Some(found);
        }
    }
    None
}
