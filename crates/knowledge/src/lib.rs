//! Retrieval subsystem for the PaperBrain CLI.
//!
//! Documents go in one end and cited answers come out the other:
//! - `extract`: per-format text extraction adapters (txt, pdf, docx)
//! - `chunker`: recursive overlapping text splitting with provenance
//! - `embeddings`: embedding providers and the model fallback chain
//! - `index`: exact nearest-neighbor index over (chunk, vector) pairs,
//!   with save/load of the full state
//! - `rag`: answer synthesis over retrieved chunks
//! - `session`: per-session orchestration (upload, ask, clear)

pub mod chunker;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod rag;
pub mod session;
pub mod types;

pub use embeddings::{resolve_provider, EmbeddingProvider};
pub use index::{inspect_bundle, BundleStats, EmbeddingIndex};
pub use rag::{AnswerOutcome, Source, Synthesizer};
pub use session::{IngestReport, Session};
pub use types::{ChatTurn, Chunk, Role, SearchResult};
