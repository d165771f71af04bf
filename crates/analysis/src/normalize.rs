//! Text canonicalization applied before tokenizing and structure detection.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// `word-<line break>word`, with optional horizontal space around the break.
static HYPHEN_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\p{L})-[ \t]*\r?\n[ \t]*(\p{L})").expect("valid hyphen break regex")
});

/// Everything outside letters (ASCII + Latin-1 accented), digits, whitespace
/// and `. , ; : ! ? -`.
static DISALLOWED_CHARS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{FF}0-9\s.,;:!?\-]")
        .expect("valid character class regex")
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static HORIZONTAL_SPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{A0}]+").expect("valid horizontal space regex"));

/// Canonicalize raw extracted text. Digits are kept; the tokenizer decides
/// whether numbers survive.
pub fn normalize(text: &str, advanced: bool) -> String {
    let text = if advanced {
        advanced_clean(text)
    } else {
        text.to_string()
    };
    collapse_whitespace(&DISALLOWED_CHARS_REGEX.replace_all(&text, " "))
}

/// Unicode compatibility folding followed by hyphenated line-break rejoining.
/// Case and line structure are preserved.
pub fn advanced_clean(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    dehyphenate(&folded)
}

/// Rejoin words split by a trailing hyphen at a line break.
pub fn dehyphenate(text: &str) -> String {
    HYPHEN_BREAK_REGEX.replace_all(text, "$1$2").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Like [`advanced_clean`], but collapses only horizontal whitespace so that
/// every line stays on its own line. Used where line anchors matter.
pub fn normalize_lines(text: &str) -> String {
    let cleaned = advanced_clean(text);
    cleaned
        .lines()
        .map(|line| HORIZONTAL_SPACE_REGEX.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// NFC canonical composition.
pub fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

/// Strip diacritics: "Ação" → "Acao".
pub fn remove_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}
