//! Word counts, vocabulary size and frequency ranking.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::stopwords::StopwordSet;
use crate::tokenize::{tokenize_with, TokenizerOptions};

/// Token → occurrence count, in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
}

impl FrequencyTable {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for token in tokens {
            *counts.entry(token.into()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// The `n` most frequent entries. Equal counts keep first-encountered
    /// order (the sort is stable over insertion order).
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(&String, &usize)> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        entries
            .into_iter()
            .take(n)
            .map(|(w, c)| (w.clone(), *c))
            .collect()
    }
}

/// Frequency statistics over tokenized text. The stopword set is injected
/// and never mutated.
#[derive(Debug, Clone)]
pub struct FrequencyAnalyzer {
    stopwords: StopwordSet,
    options: TokenizerOptions,
    /// Tokens with fewer characters are treated like stopwords.
    min_token_len: usize,
}

impl FrequencyAnalyzer {
    pub fn new(stopwords: StopwordSet, options: TokenizerOptions) -> Self {
        let stopwords = if options.fold_accents {
            stopwords.folded()
        } else {
            stopwords
        };
        Self {
            stopwords,
            options,
            min_token_len: 3,
        }
    }

    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        tokenize_with(text, &self.options)
    }

    pub fn count_words(&self, text: &str) -> usize {
        self.tokens(text).len()
    }

    pub fn vocabulary_size(&self, text: &str) -> usize {
        self.tokens(text).into_iter().collect::<HashSet<_>>().len()
    }

    fn is_filtered(&self, token: &str) -> bool {
        self.stopwords.contains(token) || token.chars().count() < self.min_token_len
    }

    pub fn frequency_table(&self, text: &str, remove_stopwords: bool) -> FrequencyTable {
        let tokens = self.tokens(text);
        if remove_stopwords {
            FrequencyTable::from_tokens(tokens.into_iter().filter(|t| !self.is_filtered(t)))
        } else {
            FrequencyTable::from_tokens(tokens)
        }
    }

    /// Top `n` tokens by descending frequency. With `remove_stopwords`, drops
    /// stopwords and tokens shorter than the minimum length first.
    pub fn most_common(&self, text: &str, n: usize, remove_stopwords: bool) -> Vec<(String, usize)> {
        self.frequency_table(text, remove_stopwords).most_common(n)
    }
}
