//! Scripted generation provider for offline tests.

use crate::client::{GenRequest, GenResponse, GenUsage, LlmClient};
use paperbrain_core::{AppError, AppResult};
use std::sync::{Arc, Mutex};

/// A client that replays canned outcomes instead of calling a model.
///
/// Each call consumes the next scripted outcome; once the script is
/// exhausted the last outcome repeats. Every request is also recorded,
/// so tests can assert on the prompts the synthesizer actually built.
pub struct ScriptedClient {
    script: Mutex<ScriptState>,
    seen: Arc<Mutex<Vec<GenRequest>>>,
}

struct ScriptState {
    outcomes: Vec<Result<String, String>>,
    next: usize,
}

impl ScriptedClient {
    /// A client that always replies with the given text.
    pub fn replying(content: impl Into<String>) -> Self {
        Self::with_script(vec![Ok(content.into())])
    }

    /// A client that always fails with a generation error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(vec![Err(message.into())])
    }

    /// A client that replays the given outcomes in order.
    pub fn with_script(outcomes: Vec<Result<String, String>>) -> Self {
        assert!(!outcomes.is_empty(), "script must have at least one outcome");
        Self {
            script: Mutex::new(ScriptState { outcomes, next: 0 }),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the requests this client has received, in order.
    pub fn requests(&self) -> Arc<Mutex<Vec<GenRequest>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &GenRequest) -> AppResult<GenResponse> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }

        let mut state = self
            .script
            .lock()
            .map_err(|_| AppError::Generation("scripted client poisoned".to_string()))?;

        let idx = state.next.min(state.outcomes.len() - 1);
        state.next += 1;

        match &state.outcomes[idx] {
            Ok(content) => Ok(GenResponse {
                content: content.clone(),
                model: request.model.clone(),
                usage: GenUsage::default(),
            }),
            Err(message) => Err(AppError::Generation(message.clone())),
        }
    }
}
