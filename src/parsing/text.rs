//! Word and emoji extraction.
//!
//! Shared by the export parser (for `word_count`) and the content view (for
//! the word and emoji rankings), so both count the same tokens.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of Unicode word characters; apostrophes inside a word are kept.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:['’]\w+)*").expect("word pattern is valid"));

/// One logical emoji per match: flag pairs, keycaps, and pictographs with
/// their variation selectors, skin tones, tag sequences and ZWJ chains.
///
/// Pictographs that render as text by default (`©`, `™`, `↔`) only count
/// when followed by U+FE0F.
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[\x{1F1E6}-\x{1F1FF}]{2}",
        r"|[0-9#*]\x{FE0F}?\x{20E3}",
        r"|(?:\p{Emoji_Presentation}|\p{Extended_Pictographic}\x{FE0F})",
        r"[\x{FE0F}\x{1F3FB}-\x{1F3FF}\x{E0020}-\x{E007F}]*",
        r"(?:\x{200D}\p{Extended_Pictographic}[\x{FE0F}\x{1F3FB}-\x{1F3FF}]*)*",
    ))
    .expect("emoji pattern is valid")
});

/// Iterates over case-folded word tokens.
///
/// # Example
///
/// ```
/// use tgstats::parsing::text::words;
///
/// let tokens: Vec<String> = words("Don't PANIC, it's fine!").collect();
/// assert_eq!(tokens, ["don't", "panic", "it's", "fine"]);
/// ```
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// Counts word tokens, stopwords included.
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Iterates over emoji units in order of appearance.
///
/// Multi-codepoint sequences are yielded whole:
///
/// ```
/// use tgstats::parsing::text::emojis;
///
/// let found: Vec<&str> = emojis("hi 👍🏽 from 🇰🇿 and 👨‍👩‍👧").collect();
/// assert_eq!(found, ["👍🏽", "🇰🇿", "👨‍👩‍👧"]);
/// ```
pub fn emojis(text: &str) -> impl Iterator<Item = &str> {
    EMOJI_RE.find_iter(text).map(|m| m.as_str())
}

/// Joins text fragments with single spaces, dropping blank ones.
pub fn join_fragments<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
