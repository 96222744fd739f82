use crate::middleware::SessionPatch;
use crate::models::Language;
use axum::{
    extract::Path,
    http::{header::REFERER, HeaderMap},
    response::Redirect,
};

/// Switch the session language and bounce back to where the visitor was.
///
/// Unsupported codes leave the session untouched and are not reported.
pub async fn change_language(
    Path(lang): Path<String>,
    headers: HeaderMap,
) -> (SessionPatch, Redirect) {
    let patch = match lang.parse::<Language>() {
        Ok(language) => {
            tracing::info!(language = %language, "Language changed");
            SessionPatch::set_language(language)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring language change");
            SessionPatch::default()
        }
    };

    let target = headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("/");

    (patch, Redirect::to(target))
}
