//! Prompt input types.

use serde::Serialize;

/// One retrieved chunk, ready to be embedded into the prompt.
///
/// Blocks are rendered in the order given; ranked order from retrieval
/// is preserved, never re-sorted here.
#[derive(Debug, Clone, Serialize)]
pub struct ContextBlock {
    /// Source document name (e.g., "report.pdf")
    pub document: String,

    /// 1-based chunk position within the document
    pub chunk_ordinal: u32,

    /// Full chunk text
    pub text: String,
}

/// A prior conversation turn for the history-aware prompt variant.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryTurn {
    /// Speaker label ("User" or "Assistant")
    pub speaker: String,

    /// Turn text
    pub content: String,
}

impl HistoryTurn {
    pub fn new(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: content.into(),
        }
    }
}
