//! Lexical statistics for a whole document.

use lexis_core::config::WordCountMode;
use lexis_core::Document;
use serde::Serialize;
use tracing::info;

use crate::frequency::FrequencyAnalyzer;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub file_name: String,
    pub file_path: String,
    pub page_count: usize,
    pub file_size_bytes: u64,
    pub word_count: usize,
    pub word_count_mode: WordCountMode,
    pub vocabulary_size: usize,
    /// Vocabulary size divided by token count; 0.0 for empty documents.
    pub lexical_diversity: f64,
    pub most_common_words: Vec<(String, usize)>,
}

/// Whitespace-separated word count of the raw text.
pub fn native_word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn lexical_diversity(vocabulary_size: usize, token_count: usize) -> f64 {
    if token_count == 0 {
        0.0
    } else {
        vocabulary_size as f64 / token_count as f64
    }
}

pub fn analyze_document(
    doc: &Document,
    analyzer: &FrequencyAnalyzer,
    mode: WordCountMode,
    top_n: usize,
) -> DocumentStats {
    let text = doc.full_text();
    let tokens = analyzer.tokens(&text);
    let token_count = tokens.len();
    let vocabulary_size = tokens
        .iter()
        .collect::<std::collections::HashSet<_>>()
        .len();

    let word_count = match mode {
        WordCountMode::Tokens => token_count,
        WordCountMode::Native => native_word_count(&text),
    };

    let stats = DocumentStats {
        file_name: doc.file_name(),
        file_path: doc.path.display().to_string(),
        page_count: doc.page_count(),
        file_size_bytes: doc.file_size,
        word_count,
        word_count_mode: mode,
        vocabulary_size,
        lexical_diversity: lexical_diversity(vocabulary_size, token_count),
        most_common_words: analyzer.most_common(&text, top_n, true),
    };
    info!(
        pages = stats.page_count,
        words = stats.word_count,
        vocabulary = stats.vocabulary_size,
        "document analyzed"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwords::StopwordSet;
    use crate::tokenize::TokenizerOptions;
    use lexis_core::{FileType, Page};
    use std::path::PathBuf;

    fn doc(text: &str) -> Document {
        Document {
            path: PathBuf::from("/tmp/artigo.pdf"),
            file_type: FileType::Pdf,
            file_size: 2048,
            pages: vec![Page::new(1, text)],
        }
    }

    fn analyzer() -> FrequencyAnalyzer {
        FrequencyAnalyzer::new(StopwordSet::portuguese(), TokenizerOptions::default())
    }

    #[test]
    fn token_mode_ignores_punctuation_and_numbers() {
        let stats = analyze_document(
            &doc("Capítulo 3 — dados, dados e mais dados!"),
            &analyzer(),
            WordCountMode::Tokens,
            5,
        );
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.vocabulary_size, 4);
        assert_eq!(stats.most_common_words[0], ("dados".to_string(), 3));
        assert_eq!(stats.file_name, "artigo.pdf");
    }

    #[test]
    fn native_mode_counts_whitespace_words() {
        let stats = analyze_document(
            &doc("Capítulo 3 — dados, dados e mais dados!"),
            &analyzer(),
            WordCountMode::Native,
            5,
        );
        assert_eq!(stats.word_count, 8);
    }

    #[test]
    fn diversity_of_empty_document_is_zero() {
        let stats = analyze_document(&doc(""), &analyzer(), WordCountMode::Tokens, 10);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.lexical_diversity, 0.0);
    }

    #[test]
    fn diversity_is_ratio() {
        assert!((lexical_diversity(3, 6) - 0.5).abs() < f64::EPSILON);
    }
}
