//! Session orchestration: uploads, questions, and the transcript.

use crate::chunker;
use crate::extract;
use crate::index::EmbeddingIndex;
use crate::rag::{AnswerOutcome, Synthesizer};
use crate::types::ChatTurn;
use paperbrain_core::config::ChunkingConfig;
use paperbrain_core::{AppError, AppResult};
use std::path::Path;

/// Outcome of a multi-file ingest: which files made it into the index
/// and which failed, with the reason.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// (file name, chunk count) per successfully ingested file
    pub ingested: Vec<(String, usize)>,
    /// (file name, error) per failed file
    pub failures: Vec<(String, String)>,
}

/// One user's pipeline state: the index, the synthesizer, and the
/// conversation so far.
///
/// All methods that change state take `&mut self`, so a session is
/// single-writer by construction.
pub struct Session {
    index: EmbeddingIndex,
    synthesizer: Synthesizer,
    chunking: ChunkingConfig,
    top_k: usize,
    documents_ingested: usize,
    transcript: Vec<ChatTurn>,
}

impl Session {
    pub fn new(
        index: EmbeddingIndex,
        synthesizer: Synthesizer,
        chunking: ChunkingConfig,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            synthesizer,
            chunking,
            top_k,
            documents_ingested: 0,
            transcript: Vec::new(),
        }
    }

    /// Extract, chunk, embed, and index one file.
    ///
    /// Returns the number of chunks added. The file name (not the full
    /// path) becomes the source document name on every chunk.
    pub async fn upload_file(&mut self, path: &Path) -> AppResult<usize> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::Extraction(format!("path {:?} has no usable file name", path))
            })?
            .to_string();

        let text = extract::extract(path)?;
        let chunks = chunker::split(&text, &name, &self.chunking)?;
        let count = chunks.len();

        self.index.insert(chunks).await?;
        self.documents_ingested += 1;

        tracing::info!("Ingested {} ({} chunks)", name, count);
        Ok(count)
    }

    /// Ingest many files, isolating failures per file.
    ///
    /// One unreadable or unsupported file never blocks the rest; it is
    /// reported in the result instead.
    pub async fn upload_all(&mut self, paths: &[std::path::PathBuf]) -> IngestReport {
        let mut report = IngestReport::default();

        for path in paths {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<unnamed>")
                .to_string();

            match self.upload_file(path).await {
                Ok(count) => report.ingested.push((name, count)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    report.failures.push((name, e.to_string()));
                }
            }
        }

        report
    }

    /// Answer a question against the session corpus.
    ///
    /// Retrieves the configured top-k chunks, synthesizes an answer with
    /// the transcript woven into the prompt, and appends both the
    /// question and the answer to the transcript. An empty corpus yields
    /// the no-documents answer without touching the model.
    pub async fn ask(&mut self, question: &str) -> AppResult<AnswerOutcome> {
        let outcome = if self.index.is_empty() {
            AnswerOutcome::no_information()
        } else {
            let results = self.index.query(question, self.top_k).await?;
            self.synthesizer
                .answer_with_history(question, &results, &self.transcript)
                .await?
        };

        self.transcript.push(ChatTurn::user(question));
        self.transcript.push(ChatTurn::assistant(&outcome.answer));

        Ok(outcome)
    }

    /// Reset the session: drop all indexed chunks, the ingest count, and
    /// the transcript. The embedding provider binding survives.
    pub fn clear(&mut self) {
        self.index.clear();
        self.documents_ingested = 0;
        self.transcript.clear();
        tracing::info!("Session cleared");
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut EmbeddingIndex {
        &mut self.index
    }

    pub fn documents_ingested(&self) -> usize {
        self.documents_ingested
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::TrigramEmbedder;
    use crate::rag::NO_INFORMATION_ANSWER;
    use crate::types::Role;
    use paperbrain_llm::ScriptedClient;
    use paperbrain_prompt::PromptBuilder;
    use std::io::Write;
    use std::sync::Arc;

    fn session(client: ScriptedClient) -> Session {
        let index = EmbeddingIndex::new(Arc::new(TrigramEmbedder::new(64)));
        let synthesizer = Synthesizer::new(
            Arc::new(client),
            PromptBuilder::new().unwrap(),
            "llama3.2",
            0.3,
            1000,
        );
        Session::new(index, synthesizer, ChunkingConfig::default(), 5)
    }

    fn write_txt(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_upload_then_ask() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_txt(&dir, "notes.txt", "Solar panels convert sunlight to power.");

        let mut session = session(ScriptedClient::replying("panels make power"));
        let count = session.upload_file(&path).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(session.documents_ingested(), 1);

        let outcome = session.ask("what do solar panels do?").await.unwrap();
        assert_eq!(outcome.answer, "panels make power");
        assert_eq!(outcome.sources.len(), 1);
        assert_eq!(outcome.sources[0].document, "notes.txt");
    }

    #[tokio::test]
    async fn test_ask_with_empty_corpus() {
        let mut session = session(ScriptedClient::replying("should never be called"));

        let outcome = session.ask("anything?").await.unwrap();
        assert_eq!(outcome.answer, NO_INFORMATION_ANSWER);
        assert!(outcome.sources.is_empty());

        // The exchange still lands in the transcript
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[0].role, Role::User);
        assert_eq!(session.transcript()[1].content, NO_INFORMATION_ANSWER);
    }

    #[tokio::test]
    async fn test_transcript_grows_per_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_txt(&dir, "doc.txt", "Beehives need ventilation in summer.");

        let mut session = session(ScriptedClient::replying("answer"));
        session.upload_file(&path).await.unwrap();

        session.ask("first?").await.unwrap();
        session.ask("second?").await.unwrap();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].content, "first?");
        assert_eq!(transcript[2].content, "second?");
    }

    #[tokio::test]
    async fn test_upload_all_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_txt(&dir, "good.txt", "Usable content in here.");
        let unsupported = write_txt(&dir, "image.png", "not really a png");
        let missing = dir.path().join("missing.txt");

        let mut session = session(ScriptedClient::replying("ok"));
        let report = session
            .upload_all(&[good, unsupported, missing])
            .await;

        assert_eq!(report.ingested.len(), 1);
        assert_eq!(report.ingested[0].0, "good.txt");
        assert_eq!(report.failures.len(), 2);
        assert_eq!(session.documents_ingested(), 1);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_txt(&dir, "doc.txt", "Some content to index.");

        let mut session = session(ScriptedClient::replying("answer"));
        session.upload_file(&path).await.unwrap();
        session.ask("q?").await.unwrap();

        session.clear();
        assert!(session.index().is_empty());
        assert_eq!(session.documents_ingested(), 0);
        assert!(session.transcript().is_empty());

        let outcome = session.ask("again?").await.unwrap();
        assert_eq!(outcome.answer, NO_INFORMATION_ANSWER);
    }
}
