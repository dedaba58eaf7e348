//! Recursive text chunking with configurable size and overlap.
//!
//! Splitting prefers the coarsest separator that yields pieces at or
//! under the target chunk size (paragraph breaks first, then line
//! breaks, sentence punctuation, words, and finally raw characters),
//! recursing into finer separators only for oversized pieces. Adjacent
//! chunks share a configurable overlap window so context survives chunk
//! boundaries.
//!
//! All sizes are measured in characters, not bytes, so multi-byte text
//! never splits inside a code point.

use crate::types::Chunk;
use paperbrain_core::config::ChunkingConfig;
use paperbrain_core::{AppError, AppResult};

/// Separator priority, coarsest first. The empty string means "split
/// anywhere" and is the last resort for separator-free runs.
pub const SEPARATORS: &[&str] = &["\n\n", "\n", ".", "!", "?", ",", " ", ""];

/// Split raw document text into overlapping chunks with provenance.
///
/// Ordinals start at 1 in document order; `total_chunks_for_source` is
/// backfilled once the final count is known. Pure with respect to its
/// inputs.
pub fn split(raw_text: &str, source_name: &str, config: &ChunkingConfig) -> AppResult<Vec<Chunk>> {
    if config.chunk_size == 0 {
        return Err(AppError::Config("chunk_size must be positive".to_string()));
    }

    if config.chunk_overlap >= config.chunk_size {
        return Err(AppError::Config(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            config.chunk_overlap, config.chunk_size
        )));
    }

    let windows = split_text(raw_text, config.chunk_size, config.chunk_overlap);
    let total = windows.len() as u32;

    let chunks = windows
        .into_iter()
        .enumerate()
        .map(|(i, text)| Chunk {
            text,
            source_document: source_name.to_string(),
            chunk_ordinal: i as u32 + 1,
            total_chunks_for_source: total,
        })
        .collect();

    tracing::debug!(
        "Chunked {} into {} chunks (size: {}, overlap: {})",
        source_name,
        total,
        config.chunk_size,
        config.chunk_overlap
    );

    Ok(chunks)
}

/// Split into windows of at most `size` chars with `overlap` carry-over.
fn split_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let pieces = split_recursive(text, SEPARATORS, size);
    merge_pieces(&pieces, size, overlap)
}

/// Break text into pieces of at most `size` chars, preferring coarse
/// separators and recursing into finer ones for oversized pieces.
fn split_recursive<'a>(text: &'a str, separators: &[&str], size: usize) -> Vec<&'a str> {
    if char_len(text) <= size {
        return vec![text];
    }

    let (sep, finer) = match separators.split_first() {
        Some((sep, finer)) => (*sep, finer),
        None => return hard_split(text, size),
    };

    if sep.is_empty() {
        return hard_split(text, size);
    }

    if !text.contains(sep) {
        return split_recursive(text, finer, size);
    }

    let mut pieces = Vec::new();
    for piece in text.split_inclusive(sep) {
        if char_len(piece) <= size {
            pieces.push(piece);
        } else {
            pieces.extend(split_recursive(piece, finer, size));
        }
    }

    pieces
}

/// Last resort: fixed-size character windows.
fn hard_split(text: &str, size: usize) -> Vec<&str> {
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let mut pieces = Vec::new();
    let mut i = 0;

    while i < boundaries.len() {
        let end = boundaries.get(i + size).copied().unwrap_or(text.len());
        pieces.push(&text[boundaries[i]..end]);
        i += size;
    }

    pieces
}

/// Greedily pack pieces into windows of at most `size` chars, seeding
/// each new window with the previous window's trailing `overlap` chars.
fn merge_pieces(pieces: &[&str], size: usize, overlap: usize) -> Vec<String> {
    let mut windows = Vec::new();
    let mut current = String::new();

    for piece in pieces {
        if !current.is_empty() && char_len(&current) + char_len(piece) > size {
            push_window(&mut windows, &current);

            // Seed the next window, shrinking the overlap if the piece
            // alone nearly fills the budget.
            let budget = size.saturating_sub(char_len(piece));
            let carry = overlap.min(budget);
            current = char_tail(&current, carry).to_string();
        }

        current.push_str(piece);
    }

    push_window(&mut windows, &current);
    windows
}

fn push_window(windows: &mut Vec<String>, window: &str) {
    let trimmed = window.trim();
    if !trimmed.is_empty() {
        windows.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The last `n` characters of `s` (the whole string if shorter).
fn char_tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }

    match s.char_indices().rev().nth(n - 1) {
        Some((start, _)) => &s[start..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, chunk_overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = split("just a short note", "note.txt", &config(100, 10)).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "just a short note");
        assert_eq!(chunks[0].source_document, "note.txt");
        assert_eq!(chunks[0].chunk_ordinal, 1);
        assert_eq!(chunks[0].total_chunks_for_source, 1);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(split("", "empty.txt", &config(100, 10)).unwrap().is_empty());
        assert!(split("  \n\n  ", "ws.txt", &config(100, 10)).unwrap().is_empty());
    }

    #[test]
    fn test_ordinals_are_contiguous_and_total_backfilled() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let chunks = split(&text, "doc.txt", &config(200, 20)).unwrap();

        assert!(chunks.len() > 1);
        let total = chunks.len() as u32;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_ordinal, i as u32 + 1);
            assert_eq!(chunk.total_chunks_for_source, total);
            assert_eq!(chunk.source_document, "doc.txt");
        }
    }

    #[test]
    fn test_chunks_respect_size_budget() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(50);
        let chunks = split(&text, "doc.txt", &config(120, 20)).unwrap();

        for chunk in &chunks {
            assert!(
                chunk.text.chars().count() <= 120,
                "chunk of {} chars exceeds budget",
                chunk.text.chars().count()
            );
        }
    }

    #[test]
    fn test_adjacent_chunks_share_overlap() {
        let text = (0..200)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let cfg = config(80, 16);
        let chunks = split(&text, "doc.txt", &cfg).unwrap();
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            // The head of each chunk was carried over from the previous
            // window's tail, modulo whitespace trimming.
            let lead: String = pair[1].text.chars().take(cfg.chunk_overlap - 4).collect();
            let lead = lead.trim();
            assert!(
                pair[0].text.contains(lead),
                "expected {:?} to appear in previous chunk {:?}",
                lead,
                pair[0].text
            );
        }
    }

    #[test]
    fn test_paragraph_boundaries_preferred() {
        let text = "First paragraph here.\n\nSecond paragraph here.\n\nThird paragraph here.";
        let chunks = split(text, "doc.txt", &config(30, 0)).unwrap();

        // Each paragraph fits the budget on its own, so no paragraph is
        // split mid-sentence.
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].text.starts_with("First"));
        assert!(chunks[1].text.starts_with("Second"));
        assert!(chunks[2].text.starts_with("Third"));
    }

    #[test]
    fn test_separator_free_run_falls_back_to_characters() {
        let text = "a".repeat(1000);
        let chunks = split(&text, "doc.txt", &config(100, 10)).unwrap();

        assert_eq!(chunks.len(), 10);
        for chunk in &chunks {
            assert_eq!(chunk.text.chars().count(), 100);
        }
    }

    #[test]
    fn test_multibyte_text_never_splits_code_points() {
        let text = "héllo wörld ünïcode ".repeat(100);
        let chunks = split(&text, "doc.txt", &config(50, 10)).unwrap();

        assert!(!chunks.is_empty());
        // Reaching here without a panic proves slicing stayed on char
        // boundaries; also sanity-check the budget in chars.
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50);
        }
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = "Sentence one. Sentence two! Sentence three? ".repeat(30);
        let cfg = config(90, 15);

        let a = split(&text, "doc.txt", &cfg).unwrap();
        let b = split(&text, "doc.txt", &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let err = split("text", "doc.txt", &config(10, 10)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_char_tail() {
        assert_eq!(char_tail("abcdef", 3), "def");
        assert_eq!(char_tail("abc", 10), "abc");
        assert_eq!(char_tail("abc", 0), "");
        assert_eq!(char_tail("héllo", 2), "lo");
    }
}
