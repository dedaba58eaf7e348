//! Answer synthesizer: retrieved chunks in, cited answer out.

use crate::rag::types::{AnswerOutcome, Source};
use crate::types::{ChatTurn, SearchResult};
use paperbrain_core::AppResult;
use paperbrain_llm::{GenRequest, LlmClient};
use paperbrain_prompt::{ContextBlock, HistoryTurn, PromptBuilder};
use std::sync::Arc;

/// Composes the answer prompt, calls the generative model, and pairs
/// the answer with one citation per retrieved chunk.
///
/// Generation failures are folded into the answer text rather than
/// raised: the sources are still valid retrieval output, and the
/// caller's transcript stays consistent either way.
pub struct Synthesizer {
    client: Arc<dyn LlmClient>,
    prompt: PromptBuilder,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Synthesizer {
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompt: PromptBuilder,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            prompt,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    /// Answer a standalone question from its retrieved chunks.
    pub async fn answer(
        &self,
        question: &str,
        results: &[SearchResult],
    ) -> AppResult<AnswerOutcome> {
        self.answer_with_history(question, results, &[]).await
    }

    /// Answer a question with conversation history woven into the prompt.
    ///
    /// The citation list always has exactly one entry per retrieval hit,
    /// in ranked order, duplicates included: two hits from the same
    /// document are two distinct citations.
    pub async fn answer_with_history(
        &self,
        question: &str,
        results: &[SearchResult],
        history: &[ChatTurn],
    ) -> AppResult<AnswerOutcome> {
        let blocks: Vec<ContextBlock> = results
            .iter()
            .map(|r| ContextBlock {
                document: r.chunk.source_document.clone(),
                chunk_ordinal: r.chunk.chunk_ordinal,
                text: r.chunk.text.clone(),
            })
            .collect();

        let turns: Vec<HistoryTurn> = history
            .iter()
            .map(|t| HistoryTurn::new(t.role.label(), t.content.clone()))
            .collect();

        let prompt = self
            .prompt
            .build_answer_with_history(question, &blocks, &turns)?;

        let request = GenRequest::new(prompt, self.model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let answer = match self.client.complete(&request).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::warn!("Generation failed, reporting in answer: {}", e);
                format!("Error generating response: {}", e)
            }
        };

        let sources = results.iter().map(Source::from_result).collect();

        Ok(AnswerOutcome { answer, sources })
    }
}
