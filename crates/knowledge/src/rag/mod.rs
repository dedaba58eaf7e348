//! Answer synthesis over retrieved chunks.

pub mod answer;
pub mod types;

pub use answer::Synthesizer;
pub use types::{AnswerOutcome, Source, NO_INFORMATION_ANSWER};
