//! Session access at the edge of the router.
//!
//! Handlers never touch the store: [`session_context_middleware`] loads a
//! [`SessionSnapshot`] into the request before the handler runs, and applies
//! any [`SessionPatch`] found in the response afterwards.

use crate::models::Language;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, IntoResponseParts, Response, ResponseParts},
};
use service_core::error::AppError;
use std::convert::Infallible;
use tower_sessions::Session;

pub const LANGUAGE_KEY: &str = "language";

/// Immutable view of the session for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub language: Language,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionSnapshot
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionSnapshot>()
            .copied()
            .ok_or_else(|| {
                tracing::error!("Session snapshot missing; is the session middleware installed?");
                (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable").into_response()
            })
    }
}

/// Session changes requested by a handler, applied after it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub language: Option<Language>,
}

impl SessionPatch {
    pub fn set_language(language: Language) -> Self {
        Self {
            language: Some(language),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.language.is_none()
    }

    async fn apply(self, session: &Session) -> Result<(), AppError> {
        if let Some(language) = self.language {
            session
                .insert(LANGUAGE_KEY, language)
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("session write failed: {}", e)))?;
        }
        Ok(())
    }
}

impl IntoResponseParts for SessionPatch {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}

/// Load the snapshot (the default language when nothing is stored), run the
/// handler, then write back its patch.
pub async fn session_context_middleware(
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let stored: Option<Language> = session
        .get(LANGUAGE_KEY)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("session read failed: {}", e)))?;

    // Only handler patches write to the store.
    let language = stored.unwrap_or_default();

    req.extensions_mut().insert(SessionSnapshot { language });

    let mut response = next.run(req).await;

    if let Some(patch) = response.extensions_mut().remove::<SessionPatch>() {
        if !patch.is_empty() {
            tracing::debug!(?patch, "Applying session patch");
            patch.apply(&session).await?;
        }
    }

    Ok(response)
}
