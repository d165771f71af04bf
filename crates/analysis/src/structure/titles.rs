//! Title candidates from styled layout spans.

use lexis_core::TextSpan;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    /// 1-based page the span was found on.
    pub page_number: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TitleRule {
    /// Spans strictly larger than this qualify regardless of weight.
    pub font_size_threshold: f32,
    pub max_words: usize,
}

impl Default for TitleRule {
    fn default() -> Self {
        Self {
            font_size_threshold: 14.0,
            max_words: 15,
        }
    }
}

impl TitleRule {
    pub fn matches(&self, span: &TextSpan) -> bool {
        let text = span.text.trim();
        if text.is_empty() {
            return false;
        }
        let styled = span.bold || span.font_size > self.font_size_threshold;
        styled && text.split_whitespace().count() <= self.max_words
    }
}

/// Title candidates of one page, in span order. No deduplication.
pub fn detect_titles(page_number: usize, spans: &[TextSpan], rule: &TitleRule) -> Vec<Title> {
    spans
        .iter()
        .filter(|span| rule.matches(span))
        .map(|span| Title {
            text: span.text.trim().to_string(),
            page_number,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_or_large_short_spans_qualify() {
        let spans = vec![
            TextSpan::new("Relatório Anual", 20.0, false),
            TextSpan::new("corpo do texto comum", 11.0, false),
            TextSpan::new("Resumo", 11.0, true),
        ];
        let titles = detect_titles(1, &spans, &TitleRule::default());
        let texts: Vec<&str> = titles.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Relatório Anual", "Resumo"]);
    }

    #[test]
    fn threshold_is_strict() {
        let spans = vec![TextSpan::new("Exatamente no limite", 14.0, false)];
        assert!(detect_titles(1, &spans, &TitleRule::default()).is_empty());
    }

    #[test]
    fn long_spans_are_rejected() {
        let long = (0..16).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let spans = vec![
            TextSpan::new(long, 24.0, true),
            TextSpan::new((0..15).map(|_| "x").collect::<Vec<_>>().join(" "), 24.0, true),
        ];
        let titles = detect_titles(2, &spans, &TitleRule::default());
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].page_number, 2);
    }

    #[test]
    fn duplicates_are_kept_and_blank_spans_skipped() {
        let spans = vec![
            TextSpan::new("Capítulo", 18.0, true),
            TextSpan::new("   ", 18.0, true),
            TextSpan::new("Capítulo", 18.0, true),
        ];
        assert_eq!(detect_titles(1, &spans, &TitleRule::default()).len(), 2);
    }
}
