use crate::middleware::SessionSnapshot;
use crate::models::PageContext;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub page: PageContext<'a>,
}

#[derive(Template)]
#[template(path = "disease.html")]
pub struct DiseaseTemplate<'a> {
    pub page: PageContext<'a>,
    pub disease_id: &'a str,
    pub disease_name: String,
    pub disease_description: String,
    pub disease_images: &'a [String],
    pub general_images: &'a [String],
}

#[derive(Template)]
#[template(path = "chatbot.html")]
pub struct ChatbotTemplate<'a> {
    pub page: PageContext<'a>,
}

pub async fn index(State(state): State<AppState>, snapshot: SessionSnapshot) -> Response {
    let page = PageContext::new(snapshot.language, &state.translations, &state.catalog);
    IndexTemplate { page }.into_response()
}

/// Unknown ids go back to the home page rather than a 404.
pub async fn disease(
    State(state): State<AppState>,
    snapshot: SessionSnapshot,
    Path(disease_name): Path<String>,
) -> Response {
    if !state.catalog.contains(&disease_name) {
        tracing::debug!(disease = %disease_name, "Unknown disease, redirecting home");
        return Redirect::to("/").into_response();
    }

    let page = PageContext::new(snapshot.language, &state.translations, &state.catalog);

    DiseaseTemplate {
        disease_name: page.translations.disease_name(&disease_name),
        disease_description: page.translations.disease_description(&disease_name),
        disease_id: &disease_name,
        disease_images: state.catalog.images_for(&disease_name),
        general_images: state.catalog.general_images(),
        page,
    }
    .into_response()
}

pub async fn chatbot(State(state): State<AppState>, snapshot: SessionSnapshot) -> Response {
    let page = PageContext::new(snapshot.language, &state.translations, &state.catalog);
    ChatbotTemplate { page }.into_response()
}
