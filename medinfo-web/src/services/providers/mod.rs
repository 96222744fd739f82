//! Chat-completion backends.
//!
//! The relay talks to a [`CompletionProvider`]; production uses the Groq
//! OpenAI-compatible endpoint, tests swap in [`MockCompletionProvider`].

pub mod groq;
pub mod mock;

use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

pub use groq::GroqProvider;
pub use mock::{MockCompletionProvider, MockReply};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Upstream answered with anything other than 200.
    #[error("API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// 200 response whose body lacks `choices[0].message.content`.
    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),

    /// Connection failure, timeout, or a body that could not be read.
    #[error("Network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `messages` in one request and return the first choice's content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;

    fn name(&self) -> &'static str;
}
