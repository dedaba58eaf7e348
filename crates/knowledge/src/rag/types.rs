//! Answer outcome types.

use crate::types::SearchResult;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Answer used when retrieval produced nothing to ground a response on.
pub const NO_INFORMATION_ANSWER: &str =
    "I don't have any documents to answer from. Please upload some documents first.";

/// Excerpts longer than this are cut at the last word boundary.
pub const MAX_EXCERPT_LENGTH: usize = 200;

/// A citation: where one piece of supporting context came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub document: String,
    pub chunk_ordinal: u32,
    pub excerpt: String,
}

impl Source {
    /// Build a citation from a retrieval hit, truncating the excerpt at
    /// a word boundary.
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            document: result.chunk.source_document.clone(),
            chunk_ordinal: result.chunk.chunk_ordinal,
            excerpt: excerpt_of(&result.chunk.text),
        }
    }
}

/// The synthesized answer together with its citations, one per
/// retrieved chunk, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub sources: Vec<Source>,
}

impl AnswerOutcome {
    /// Outcome for a question asked against an empty corpus.
    pub fn no_information() -> Self {
        Self {
            answer: NO_INFORMATION_ANSWER.to_string(),
            sources: Vec::new(),
        }
    }
}

/// First `MAX_EXCERPT_LENGTH` characters of `text`, backed up to the
/// last word boundary, with an ellipsis when anything was cut.
fn excerpt_of(text: &str) -> String {
    if text.chars().count() <= MAX_EXCERPT_LENGTH {
        return text.to_string();
    }

    let head: String = text.chars().take(MAX_EXCERPT_LENGTH).collect();
    let cut = head
        .unicode_word_indices()
        .map(|(i, w)| i + w.len())
        .take_while(|end| *end < head.len())
        .last()
        .unwrap_or(head.len());

    format!("{}…", head[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn result_with_text(text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                text: text.to_string(),
                source_document: "doc.pdf".to_string(),
                chunk_ordinal: 4,
                total_chunks_for_source: 9,
            },
            distance: 0.5,
        }
    }

    #[test]
    fn test_short_text_kept_verbatim() {
        let source = Source::from_result(&result_with_text("short excerpt"));
        assert_eq!(source.excerpt, "short excerpt");
        assert_eq!(source.document, "doc.pdf");
        assert_eq!(source.chunk_ordinal, 4);
    }

    #[test]
    fn test_long_text_truncated_at_word_boundary() {
        let text = "word ".repeat(100);
        let source = Source::from_result(&result_with_text(&text));

        assert!(source.excerpt.chars().count() <= MAX_EXCERPT_LENGTH + 1);
        assert!(source.excerpt.ends_with('…'));
        // No half word before the ellipsis
        let body = source.excerpt.trim_end_matches('…');
        assert!(body.ends_with("word"));
    }

    #[test]
    fn test_no_information_outcome() {
        let outcome = AnswerOutcome::no_information();
        assert_eq!(outcome.answer, NO_INFORMATION_ANSWER);
        assert!(outcome.sources.is_empty());
    }
}
