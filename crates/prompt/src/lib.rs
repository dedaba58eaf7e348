//! Prompt templating for the PaperBrain CLI.
//!
//! Renders the composite answer-synthesis prompt: retrieved context
//! blocks, optional conversation history, and the user's question, in a
//! Handlebars template that can be overridden from a YAML file.

pub mod builder;
pub mod types;

pub use builder::PromptBuilder;
pub use types::{ContextBlock, HistoryTurn};
