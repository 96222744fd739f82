use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of `POST /api/chat`. The `Display` text is what the browser sees
/// in the `error` field.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("No query provided.")]
    MissingQuery,

    #[error("Malformed chat form: {0}")]
    MalformedForm(String),

    #[error("Upload too large")]
    PayloadTooLarge,

    #[error("Invalid image format: {0}")]
    InvalidImage(String),

    #[error("Error from API: {} - {body}", .status.as_u16())]
    Upstream { status: StatusCode, body: String },

    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::MissingQuery | ChatError::MalformedForm(_) | ChatError::InvalidImage(_) => {
                StatusCode::BAD_REQUEST
            }
            ChatError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ChatError::Upstream { status, .. } => *status,
            ChatError::UnexpectedResponse(_) => StatusCode::BAD_GATEWAY,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::MissingQuery | ChatError::MalformedForm(_) => "bad_request",
            ChatError::PayloadTooLarge => "payload_too_large",
            ChatError::InvalidImage(_) => "invalid_image",
            ChatError::Upstream { .. } | ChatError::UnexpectedResponse(_) => "upstream_error",
            ChatError::Internal(_) => "internal_error",
        }
    }
}

impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> Self {
        match err {
            // A success code other than 200 still carries no answer.
            ProviderError::Status { status, body } if status.is_success() => {
                ChatError::UnexpectedResponse(format!("status {} - {}", status.as_u16(), body))
            }
            ProviderError::Status { status, body } => ChatError::Upstream { status, body },
            ProviderError::MalformedResponse(detail) => ChatError::UnexpectedResponse(detail),
            ProviderError::Network(detail) | ProviderError::NotConfigured(detail) => {
                ChatError::Internal(detail)
            }
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
