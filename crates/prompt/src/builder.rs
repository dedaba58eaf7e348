//! Prompt builder for rendering the answer-synthesis template.

use crate::types::{ContextBlock, HistoryTurn};
use handlebars::Handlebars;
use paperbrain_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// History turns beyond this are dropped from the prompt (oldest first).
pub const MAX_HISTORY_TURNS: usize = 5;

/// Built-in answer template.
///
/// The rules mirror the behavior expected of the synthesizer: use the
/// whole context, cite document and chunk, and refuse to invent facts.
const DEFAULT_ANSWER_TEMPLATE: &str = "\
You are a helpful assistant that answers questions based on the provided context.

IMPORTANT RULES:
1. Use ALL relevant information from the provided context to give comprehensive answers
2. If the answer spans multiple chunks, combine and synthesize the information
3. When the question asks for components, features, or details, provide ALL available information
4. Organize your answer logically with clear structure
5. When citing information, mention which document and chunk it comes from
6. If some information is missing, say \"Additional information may be available in other parts of the document\"
7. Do not make up or hallucinate information not found in the context

Context (multiple chunks may contain related information):
{{context}}

{{#if history}}Previous conversation:
{{history}}

Current question: {{question}}{{else}}Question: {{question}}{{/if}}

Provide a comprehensive answer using all relevant information from the context above:";

/// Template variables for rendering.
#[derive(Debug, Serialize)]
struct AnswerVars {
    context: String,
    question: String,
    history: Option<String>,
}

/// Shape of a template override file.
#[derive(Debug, Deserialize)]
struct TemplateFile {
    template: String,
}

/// Renders the composite answer prompt.
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
}

impl PromptBuilder {
    /// Create a builder with the built-in answer template.
    pub fn new() -> AppResult<Self> {
        Self::with_template(DEFAULT_ANSWER_TEMPLATE)
    }

    /// Create a builder with a custom Handlebars template.
    ///
    /// The template receives `context`, `question`, and optional `history`
    /// variables.
    pub fn with_template(template: &str) -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Plain text output, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string("answer", template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self { handlebars })
    }

    /// Create a builder with a template loaded from a YAML override file.
    pub fn from_template_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Prompt(format!("Failed to read template file {:?}: {}", path, e))
        })?;

        let file: TemplateFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Prompt(format!("Failed to parse template file {:?}: {}", path, e))
        })?;

        tracing::debug!("Loaded prompt template override from {:?}", path);
        Self::with_template(&file.template)
    }

    /// Build the answer prompt for a question and its retrieved blocks.
    pub fn build_answer(&self, question: &str, blocks: &[ContextBlock]) -> AppResult<String> {
        self.render(question, blocks, None)
    }

    /// Build the history-aware answer prompt.
    ///
    /// At most the last [`MAX_HISTORY_TURNS`] turns are included; the
    /// context blocks are handled exactly as in [`build_answer`].
    ///
    /// [`build_answer`]: Self::build_answer
    pub fn build_answer_with_history(
        &self,
        question: &str,
        blocks: &[ContextBlock],
        history: &[HistoryTurn],
    ) -> AppResult<String> {
        if history.is_empty() {
            return self.render(question, blocks, None);
        }

        let tail_start = history.len().saturating_sub(MAX_HISTORY_TURNS);
        let rendered: Vec<String> = history[tail_start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker, turn.content))
            .collect();

        self.render(question, blocks, Some(rendered.join("\n")))
    }

    fn render(
        &self,
        question: &str,
        blocks: &[ContextBlock],
        history: Option<String>,
    ) -> AppResult<String> {
        let vars = AnswerVars {
            context: render_context(blocks),
            question: question.to_string(),
            history,
        };

        self.handlebars
            .render("answer", &vars)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

/// Render context blocks as clearly delimited sections, in given order.
fn render_context(blocks: &[ContextBlock]) -> String {
    let parts: Vec<String> = blocks
        .iter()
        .map(|block| {
            format!(
                "[Document: {}, Chunk {}]\n{}\n",
                block.document, block.chunk_ordinal, block.text
            )
        })
        .collect();

    parts.join("\n---\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_blocks() -> Vec<ContextBlock> {
        vec![
            ContextBlock {
                document: "doc.txt".to_string(),
                chunk_ordinal: 2,
                text: "Second chunk text".to_string(),
            },
            ContextBlock {
                document: "other.pdf".to_string(),
                chunk_ordinal: 1,
                text: "First chunk of other".to_string(),
            },
        ]
    }

    #[test]
    fn test_build_answer_embeds_blocks_in_order() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder.build_answer("what is X?", &sample_blocks()).unwrap();

        assert!(prompt.contains("[Document: doc.txt, Chunk 2]"));
        assert!(prompt.contains("[Document: other.pdf, Chunk 1]"));
        assert!(prompt.contains("Second chunk text"));
        assert!(prompt.contains("Question: what is X?"));

        // Ranked order preserved
        let first = prompt.find("doc.txt").unwrap();
        let second = prompt.find("other.pdf").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_blocks_are_delimited() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder.build_answer("q", &sample_blocks()).unwrap();
        assert!(prompt.contains("\n---\n"));
    }

    #[test]
    fn test_empty_blocks_render_empty_context() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder.build_answer("q", &[]).unwrap();
        assert!(prompt.contains("Question: q"));
        assert!(!prompt.contains("[Document:"));
    }

    #[test]
    fn test_history_variant_tags_roles() {
        let builder = PromptBuilder::new().unwrap();
        let history = vec![
            HistoryTurn::new("User", "hello"),
            HistoryTurn::new("Assistant", "hi there"),
        ];

        let prompt = builder
            .build_answer_with_history("next question", &sample_blocks(), &history)
            .unwrap();

        assert!(prompt.contains("Previous conversation:"));
        assert!(prompt.contains("User: hello"));
        assert!(prompt.contains("Assistant: hi there"));
        assert!(prompt.contains("Current question: next question"));
    }

    #[test]
    fn test_history_caps_at_five_turns() {
        let builder = PromptBuilder::new().unwrap();
        let history: Vec<HistoryTurn> = (0..8)
            .map(|i| HistoryTurn::new("User", format!("turn {}", i)))
            .collect();

        let prompt = builder
            .build_answer_with_history("q", &[], &history)
            .unwrap();

        assert!(!prompt.contains("turn 2"));
        assert!(prompt.contains("turn 3"));
        assert!(prompt.contains("turn 7"));
    }

    #[test]
    fn test_empty_history_falls_back_to_plain_prompt() {
        let builder = PromptBuilder::new().unwrap();
        let prompt = builder.build_answer_with_history("q", &[], &[]).unwrap();
        assert!(prompt.contains("Question: q"));
        assert!(!prompt.contains("Previous conversation:"));
    }

    #[test]
    fn test_template_override_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "template: \"Q={{{{question}}}} C={{{{context}}}}\"").unwrap();

        let builder = PromptBuilder::from_template_file(file.path()).unwrap();
        let prompt = builder.build_answer("why?", &[]).unwrap();
        assert_eq!(prompt, "Q=why? C=");
    }

    #[test]
    fn test_bad_template_file_is_prompt_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nonsense: [").unwrap();

        let result = PromptBuilder::from_template_file(file.path());
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
