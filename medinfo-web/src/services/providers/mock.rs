//! In-process completion provider that records what it was asked.

use super::{CompletionProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// What the mock answers with on every call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Answer(String),
    Status(StatusCode, String),
    Malformed(String),
    Network(String),
}

pub struct MockCompletionProvider {
    reply: MockReply,
    call_count: AtomicU64,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            call_count: AtomicU64::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answer: impl Into<String>) -> Self {
        Self::new(MockReply::Answer(answer.into()))
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Messages of every call so far, oldest first.
    pub async fn recorded_requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(messages.to_vec());

        tracing::info!(
            message_count = messages.len(),
            "[MOCK] Completion would be requested"
        );

        match &self.reply {
            MockReply::Answer(answer) => Ok(answer.clone()),
            MockReply::Status(status, body) => Err(ProviderError::Status {
                status: *status,
                body: body.clone(),
            }),
            MockReply::Malformed(detail) => Err(ProviderError::MalformedResponse(detail.clone())),
            MockReply::Network(detail) => Err(ProviderError::Network(detail.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
