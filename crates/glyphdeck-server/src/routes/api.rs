use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use glyphdeck_core::CollectionDescriptor;

use super::browse::find_session;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/collections", get(get_collections))
        .route("/api/sessions/{id}", get(get_session_page))
}

#[derive(Serialize)]
struct CollectionSummary {
    id: String,
    title: String,
    family: String,
    version: Option<String>,
    lazy: bool,
}

impl From<&CollectionDescriptor> for CollectionSummary {
    fn from(c: &CollectionDescriptor) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            family: c.family.clone(),
            version: c.version.clone(),
            lazy: c.is_lazy(),
        }
    }
}

async fn get_collections(State(state): State<AppState>) -> Json<Vec<CollectionSummary>> {
    Json(state.manifest.collections().iter().map(Into::into).collect())
}

/// The session's current page as JSON.
async fn get_session_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match find_session(&state, &id) {
        Ok((_, browser)) => Json(browser.current().await).into_response(),
        Err(response) => response,
    }
}
