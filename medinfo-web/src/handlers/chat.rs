use crate::error::ChatError;
use crate::models::ChatAnswer;
use crate::services::metrics::record_chat_outcome;
use crate::services::{ChatRequest, ImageUpload};
use crate::AppState;
use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use std::collections::HashMap;

/// The `query`/`image` fields of a chat submission.
///
/// Browsers post `multipart/form-data`; a url-encoded body can carry the
/// query alone. Anything else reads as an empty form.
#[derive(Debug, Default)]
pub struct ChatForm(pub ChatRequest);

#[async_trait]
impl<S> FromRequest<S> for ChatForm
where
    S: Send + Sync,
{
    type Rejection = ChatError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;
            return read_multipart(multipart).await.map(ChatForm);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;
            return Ok(ChatForm(ChatRequest {
                query: fields.get("query").cloned(),
                image: None,
            }));
        }

        Ok(ChatForm::default())
    }
}

/// Bodies over the configured cap are reported as such, not as bad input.
fn form_error(status: StatusCode, detail: String) -> ChatError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ChatError::PayloadTooLarge
    } else {
        ChatError::MalformedForm(detail)
    }
}

fn multipart_error(err: MultipartError) -> ChatError {
    form_error(err.status(), err.body_text())
}

async fn read_multipart(mut multipart: Multipart) -> Result<ChatRequest, ChatError> {
    let mut request = ChatRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().map(str::to_owned);

        match name.as_deref() {
            Some("query") => {
                let text = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                request.query = Some(text);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;

                // An empty filename is what browsers send when no file was picked.
                if !file_name.is_empty() {
                    request.image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(request)
}

pub async fn chat(
    State(state): State<AppState>,
    form: Result<ChatForm, ChatError>,
) -> Result<Json<ChatAnswer>, ChatError> {
    let result = match form {
        Ok(ChatForm(request)) => state.chat_relay.relay(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(answer) => {
            record_chat_outcome("answered");
            Ok(Json(ChatAnswer { answer }))
        }
        Err(e) => {
            record_chat_outcome(e.kind());
            Err(e)
        }
    }
}
