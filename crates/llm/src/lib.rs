//! Generative-model integration crate for the PaperBrain CLI.
//!
//! This crate provides a provider-agnostic abstraction for the answer
//! synthesis call: prompt string in, answer string out. The call is
//! synchronous from the caller's perspective, may take seconds, and may
//! fail; callers decide how to recover.
//!
//! # Providers
//! - **Ollama**: local LLM runtime over HTTP (default)
//! - **Scripted**: canned responses for offline tests
//!
//! # Example
//! ```no_run
//! use paperbrain_llm::{GenRequest, LlmClient, OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = GenRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{GenRequest, GenResponse, GenUsage, LlmClient};
pub use factory::create_client;
pub use providers::{OllamaClient, ScriptedClient};
