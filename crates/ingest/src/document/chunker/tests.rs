//! Tests for the chunker.

use super::helpers::{chunk_words, count_words, fit_to_limit};
use super::types::ChunkConfig;
use super::Chunker;
use crate::document::TextUnit;

fn unit(text: &str) -> TextUnit {
    TextUnit {
        ordinal: 3,
        text: text.to_string(),
    }
}

fn numbered(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

// ── Windowing ───────────────────────────────────────────────────────

#[test]
fn splits_into_fixed_windows() {
    assert_eq!(chunk_words("a b c d e", 2), vec!["a b", "c d", "e"]);
}

#[test]
fn all_but_last_have_exactly_n_words() {
    let chunks = chunk_words(&numbered(1003), 100);
    assert_eq!(chunks.len(), 11);
    for c in &chunks[..chunks.len() - 1] {
        assert_eq!(count_words(c), 100);
    }
    assert_eq!(count_words(chunks.last().unwrap()), 3);
}

#[test]
fn rejoin_reconstructs_normalized_text() {
    let text = "  The quick\tbrown   fox\n\njumps over\r\nthe  lazy dog.  ";
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    for n in 1..=10 {
        assert_eq!(chunk_words(text, n).join(" "), normalized, "n = {n}");
    }
}

#[test]
fn chunking_is_deterministic() {
    let text = numbered(977);
    assert_eq!(chunk_words(&text, 400), chunk_words(&text, 400));
}

#[test]
fn empty_text_produces_no_chunks() {
    assert!(chunk_words("", 400).is_empty());
    assert!(chunk_words(" \n\t ", 400).is_empty());
}

#[test]
fn zero_window_is_clamped() {
    assert_eq!(chunk_words("a b", 0), vec!["a", "b"]);
}

// ── Backend limit ───────────────────────────────────────────────────

#[test]
fn fit_leaves_small_chunks_alone() {
    assert_eq!(fit_to_limit("a b c", 1024), vec!["a b c"]);
}

#[test]
fn fit_halves_until_under_limit() {
    let text = numbered(2500);
    let pieces = fit_to_limit(&text, 1024);
    // 2500 -> 1250 + 1250 -> 625 x 4
    assert_eq!(pieces.len(), 4);
    assert!(pieces.iter().all(|p| count_words(p) == 625));
    assert_eq!(pieces.join(" "), text);
}

#[test]
fn fit_gives_extra_word_to_first_half() {
    let pieces = fit_to_limit("a b c d e", 3);
    assert_eq!(pieces, vec!["a b c", "d e"]);
}

#[test]
fn fit_preserves_order_across_levels() {
    let text = numbered(37);
    let pieces = fit_to_limit(&text, 4);
    assert!(pieces.iter().all(|p| count_words(p) <= 4));
    assert_eq!(pieces.join(" "), text);
}

// ── Chunker ─────────────────────────────────────────────────────────

#[test]
fn chunker_tags_unit_and_index() {
    let chunker = Chunker::new(ChunkConfig {
        max_chunk_words: 2,
        backend_limit_words: 1024,
    });
    let chunks = chunker.chunk_unit(&unit("a b c d e"));
    let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["a b", "c d", "e"]);
    assert!(chunks.iter().all(|c| c.unit == 3));
    assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(chunks.iter().map(|c| c.words).collect::<Vec<_>>(), vec![2, 2, 1]);
}

#[test]
fn chunker_applies_backend_limit_after_windowing() {
    let chunker = Chunker::new(ChunkConfig {
        max_chunk_words: 10,
        backend_limit_words: 4,
    });
    let text = numbered(20);
    let chunks = chunker.chunk_unit(&unit(&text));
    // each 10-word window -> 5 + 5 -> 3 + 2 + 3 + 2
    assert_eq!(chunks.len(), 8);
    assert!(chunks.iter().all(|c| c.words <= 4));
    let rejoined = chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>().join(" ");
    assert_eq!(rejoined, text);
}

#[test]
fn default_config_uses_400_words() {
    let chunker = Chunker::default();
    assert_eq!(chunker.config().max_chunk_words, 400);
    let chunks = chunker.chunk_unit(&unit(&numbered(900)));
    assert_eq!(chunks.iter().map(|c| c.words).collect::<Vec<_>>(), vec![400, 400, 100]);
}
