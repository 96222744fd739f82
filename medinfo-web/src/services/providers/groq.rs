//! Groq chat completions (OpenAI-compatible `/chat/completions`).

use super::{CompletionProvider, ProviderError};
use crate::config::ChatSettings;
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

pub struct GroqProvider {
    client: Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    api_key: Option<Secret<String>>,
}

impl GroqProvider {
    pub fn new(settings: &ChatSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_key: settings.api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            model = %self.model,
            message_count = messages.len(),
            "Sending request to Groq API"
        );

        let mut builder = self.client.traced_post(&self.api_url).json(&request);
        // Without a key the call still goes out and is refused upstream.
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(url = %self.api_url, error = %e, "Groq request failed");
            if e.is_timeout() {
                ProviderError::Network(format!("request timed out: {}", e))
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error body from Groq API"
                    );
                    format!("<unreadable body: {}>", e)
                }
            };
            return Err(ProviderError::Status { status, body });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to read response body: {}", e)))?;

        let completion: CompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".to_string()))
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}
