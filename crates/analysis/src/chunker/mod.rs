//! Greedy word-packing chunker.
//!
//! Splits text into segments of at most `max_length` characters without ever
//! breaking a word, so every segment fits a model's input window. A single
//! word longer than `max_length` becomes its own oversized chunk.

use serde::Serialize;

/// A chunk of text with its position in the chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 0-based index within the document.
    pub index: usize,
    /// Words joined by single spaces.
    pub content: String,
}

/// Lazy chunk sequence over a borrowed text. Cheap to clone; a clone restarts
/// from its own position.
#[derive(Debug, Clone)]
pub struct ChunkSplitter<'a> {
    words: std::str::SplitWhitespace<'a>,
    pending: Option<&'a str>,
    max_length: usize,
    next_index: usize,
}

impl<'a> ChunkSplitter<'a> {
    pub fn new(text: &'a str, max_length: usize) -> Self {
        Self {
            words: text.split_whitespace(),
            pending: None,
            max_length,
            next_index: 0,
        }
    }
}

impl Iterator for ChunkSplitter<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let mut words: Vec<&str> = Vec::new();
        // Each word costs its length plus one joining space.
        let mut current_length = 0usize;

        while let Some(word) = self.pending.take().or_else(|| self.words.next()) {
            let word_length = word.chars().count() + 1;
            if current_length + word_length > self.max_length && !words.is_empty() {
                self.pending = Some(word);
                break;
            }
            words.push(word);
            current_length += word_length;
        }

        if words.is_empty() {
            return None;
        }
        let chunk = Chunk {
            index: self.next_index,
            content: words.join(" "),
        };
        self.next_index += 1;
        Some(chunk)
    }
}

/// Split `text` into word-boundary chunks of at most `max_length` characters.
pub fn split_into_chunks(text: &str, max_length: usize) -> Vec<String> {
    ChunkSplitter::new(text, max_length)
        .map(|c| c.content)
        .collect()
}

#[cfg(test)]
mod tests;
