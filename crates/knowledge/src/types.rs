//! Retrieval domain types.

use serde::{Deserialize, Serialize};

/// A bounded span of source text with provenance metadata.
///
/// Chunks are immutable once created by the chunker: they are embedded,
/// stored in the index, and handed back by queries, but never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text payload
    pub text: String,

    /// Name of the source document (e.g., "report.pdf")
    pub source_document: String,

    /// 1-based position within the source document
    pub chunk_ordinal: u32,

    /// Total number of chunks produced from the source document
    pub total_chunks_for_source: u32,
}

/// A retrieval hit: a chunk and its distance from the query.
///
/// Distance is squared Euclidean; lower means more similar. Results are
/// ranked ascending. A `SearchResult` owns its chunk by value, so it
/// stays valid even if the index is cleared afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub distance: f32,
}

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used in history-aware prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// One entry of a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
