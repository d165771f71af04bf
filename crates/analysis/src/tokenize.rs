//! Lowercase word tokenization under a configurable alphabet.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{advanced_clean, normalize_unicode, remove_accents};

/// Runs of anything that is not a Latin letter.
static NON_LETTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{FF}]+")
        .expect("valid letter alphabet regex")
});

/// Runs of anything that is neither a Latin letter nor an ASCII digit.
static NON_ALNUM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{FF}0-9]+")
        .expect("valid alphanumeric alphabet regex")
});

/// Tokenizer flags. The tokenizer is the only place deciding whether digits
/// survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    pub keep_numbers: bool,
    pub advanced_clean: bool,
    /// Strip diacritics so "ação" and "acao" count as one word.
    pub fold_accents: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            keep_numbers: false,
            advanced_clean: true,
            fold_accents: false,
        }
    }
}

/// Split `text` into lowercase word tokens.
///
/// With `keep_numbers` unset, digits separate tokens exactly like any other
/// non-letter character (`"abc123def"` → `["abc", "def"]`).
pub fn tokenize(text: &str, keep_numbers: bool, advanced_clean_text: bool) -> Vec<String> {
    // Decomposed input ("e" + U+0301) must compose before the alphabet filter.
    let cleaned = if advanced_clean_text {
        advanced_clean(text)
    } else {
        normalize_unicode(text)
    };

    let alphabet: &Regex = if keep_numbers {
        &NON_ALNUM_REGEX
    } else {
        &NON_LETTER_REGEX
    };

    alphabet
        .replace_all(&cleaned, " ")
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

pub fn tokenize_with(text: &str, options: &TokenizerOptions) -> Vec<String> {
    let tokens = tokenize(text, options.keep_numbers, options.advanced_clean);
    if options.fold_accents {
        tokens.iter().map(|t| remove_accents(t)).collect()
    } else {
        tokens
    }
}
