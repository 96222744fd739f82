//! Turns one chat form submission into one upstream completion call.

use crate::error::ChatError;
use crate::models::ChatMessage;
use crate::services::metrics::observe_upstream_duration;
use crate::services::providers::CompletionProvider;
use crate::services::upload::{inline_image, ImageUpload};
use std::sync::Arc;
use std::time::Instant;

/// Fields of one `POST /api/chat` submission.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub query: Option<String>,
    pub image: Option<ImageUpload>,
}

pub struct ChatRelay {
    provider: Arc<dyn CompletionProvider>,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Validate the submission, call the provider exactly once, return its answer.
    ///
    /// Nothing is sent upstream when the query is missing or the image does
    /// not decode. Failures are never retried.
    pub async fn relay(&self, request: ChatRequest) -> Result<String, ChatError> {
        let query = request
            .query
            .filter(|query| !query.is_empty())
            .ok_or(ChatError::MissingQuery)?;

        let image_url = match request.image {
            Some(upload) => Some(inline_image(upload).await?),
            None => None,
        };
        let has_image = image_url.is_some();

        let message = ChatMessage::user(query, image_url);

        let start = Instant::now();
        let result = self
            .provider
            .complete(std::slice::from_ref(&message))
            .await;
        observe_upstream_duration(start.elapsed());

        match result {
            Ok(answer) => {
                tracing::info!(
                    provider = self.provider.name(),
                    has_image,
                    "Processed response from API"
                );
                Ok(answer)
            }
            Err(e) => {
                let err = ChatError::from(e);
                tracing::error!(
                    provider = self.provider.name(),
                    status = err.status().as_u16(),
                    error = %err,
                    "Chat completion failed"
                );
                Err(err)
            }
        }
    }
}
