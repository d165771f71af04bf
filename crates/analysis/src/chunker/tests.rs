//! Tests for the chunker.

use super::{split_into_chunks, ChunkSplitter};

fn assert_bounded(chunks: &[String], max_length: usize) {
    for c in chunks {
        let len = c.chars().count();
        let single_word = !c.contains(' ');
        assert!(
            len <= max_length || single_word,
            "chunk of {len} chars exceeds {max_length}: {c:?}"
        );
    }
}

// ── Bounds ──────────────────────────────────────────────────────────

#[test]
fn repeated_word_splits_into_bounded_chunks() {
    let text = "palavra ".repeat(100);
    let chunks = split_into_chunks(&text, 50);
    assert!(chunks.len() > 1);
    for c in &chunks {
        assert!(c.len() <= 50, "chunk too long: {}", c.len());
    }
}

#[test]
fn oversized_word_becomes_its_own_chunk() {
    let giant = "x".repeat(40);
    let text = format!("um dois {giant} três");
    let chunks = split_into_chunks(&text, 10);
    assert_eq!(chunks, vec!["um dois", giant.as_str(), "três"]);
}

#[test]
fn bound_holds_for_many_lengths() {
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
                tempor incididunt ut labore et dolore magna aliqua. Ação reação emoção \
                paralelepípedo inconstitucionalissimamente";
    for max in 1..=80 {
        assert_bounded(&split_into_chunks(text, max), max);
    }
}

#[test]
fn length_counts_characters_not_bytes() {
    // 4 words of 4 chars (8 bytes each with accents): "ação ação" is 9 chars.
    let chunks = split_into_chunks("ação ação ação ação", 10);
    assert_eq!(chunks, vec!["ação ação", "ação ação"]);
}

// ── Reconstruction ──────────────────────────────────────────────────

#[test]
fn joining_chunks_reconstructs_word_sequence() {
    let text = "  primeira linha\n\nsegunda\tlinha   com espaços   \n fim ";
    let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
    for max in [1, 3, 7, 12, 1000] {
        let chunks = split_into_chunks(text, max);
        assert_eq!(chunks.join(" "), expected, "max_length {max}");
    }
}

#[test]
fn empty_and_blank_text_yield_no_chunks() {
    assert!(split_into_chunks("", 100).is_empty());
    assert!(split_into_chunks(" \n\t ", 100).is_empty());
}

#[test]
fn short_text_is_one_chunk() {
    assert_eq!(split_into_chunks("cabe tudo", 100), vec!["cabe tudo"]);
}

// ── Iterator ────────────────────────────────────────────────────────

#[test]
fn indices_are_sequential() {
    let text = "a b c d e f g h i j";
    let indices: Vec<usize> = ChunkSplitter::new(text, 4).map(|c| c.index).collect();
    assert_eq!(indices, (0..indices.len()).collect::<Vec<_>>());
}

#[test]
fn splitter_is_restartable() {
    let text = "alfa beta gama delta épsilon zeta eta teta";
    let splitter = ChunkSplitter::new(text, 12);
    let first: Vec<_> = splitter.clone().collect();
    let second: Vec<_> = splitter.collect();
    assert_eq!(first, second);
}

#[test]
fn take_stops_early() {
    let text = "w ".repeat(1000);
    let taken: Vec<_> = ChunkSplitter::new(&text, 10).take(5).collect();
    assert_eq!(taken.len(), 5);
    assert_eq!(taken[4].index, 4);
}
