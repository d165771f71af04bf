use serde::Serialize;

use crate::frequency::FrequencyAnalyzer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub word: String,
    pub frequency: usize,
}

/// The `n` most frequent non-stopword tokens of `text`.
pub fn extract_keywords(analyzer: &FrequencyAnalyzer, text: &str, n: usize) -> Vec<Keyword> {
    analyzer
        .most_common(text, n, true)
        .into_iter()
        .map(|(word, frequency)| Keyword { word, frequency })
        .collect()
}
