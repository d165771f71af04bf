//! Style estimation for backends that only report plain text.
//!
//! Each non-blank line becomes one span. Short all-caps lines and
//! chapter-style headings are promoted to bold, larger spans.

use std::sync::LazyLock;

use lexis_core::TextSpan;
use regex::Regex;

pub const BODY_FONT_SIZE: f32 = 11.0;
const CAPS_HEADING_FONT_SIZE: f32 = 16.0;
const CHAPTER_HEADING_FONT_SIZE: f32 = 18.0;
const CAPS_HEADING_MAX_CHARS: usize = 100;

static CHAPTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:chapter|section|part|cap[íi]tulo|se[çc][ãa]o|parte)\s+(?:[0-9]+|[IVXLCDM]+)\b")
        .expect("valid chapter heading regex")
});

/// Estimate the style of a single line.
pub fn estimate_span(line: &str) -> TextSpan {
    let text = line.trim();
    if CHAPTER_REGEX.is_match(text) {
        return TextSpan::new(text, CHAPTER_HEADING_FONT_SIZE, true);
    }
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    let has_letters = letters.peek().is_some();
    if has_letters
        && text.chars().count() < CAPS_HEADING_MAX_CHARS
        && letters.all(|c| c.is_uppercase())
    {
        return TextSpan::new(text, CAPS_HEADING_FONT_SIZE, true);
    }
    TextSpan::new(text, BODY_FONT_SIZE, false)
}

pub fn spans_from_text(text: &str) -> Vec<TextSpan> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(estimate_span)
        .collect()
}

/// Font size for a Markdown heading level (1-6).
pub fn heading_font_size(level: usize) -> f32 {
    (24.0 - 2.0 * level.clamp(1, 6) as f32).max(BODY_FONT_SIZE)
}
