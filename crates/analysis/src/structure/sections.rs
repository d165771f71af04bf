//! Numbered / lettered section headers found at line starts.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `1.` / `2.3` / `IV.` / `A.` at a line start, then the rest of the line.
static SECTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*((?:[0-9]+(?:\.[0-9]+)*|[IVXLCDM]+|[A-Z])\.?)[ \t]+([^\n]+)$")
        .expect("valid section header regex")
});

const MIN_TITLE_CHARS: usize = 5;
const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Label as written, e.g. "1.", "IV.", "A.".
    pub number: String,
    pub title: String,
}

/// Scan `text` for section headers in document order. Titles must be
/// strictly between 5 and 200 characters long.
pub fn detect_sections(text: &str) -> Vec<Section> {
    SECTION_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let number = caps.get(1)?.as_str().to_string();
            let title = caps.get(2)?.as_str().trim().to_string();
            let len = title.chars().count();
            (len > MIN_TITLE_CHARS && len < MAX_TITLE_CHARS).then_some(Section { number, title })
        })
        .collect()
}
