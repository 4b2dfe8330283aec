use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::views::render_browser;
use crate::state::{AppState, CatalogBrowser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/{id}/search", get(search))
        .route("/sessions/{id}/page", get(goto_page))
        .route("/sessions/{id}/next", get(next_page))
        .route("/sessions/{id}/prev", get(prev_page))
}

/// Look up a live session, or the response to send instead.
pub(crate) fn find_session(
    state: &AppState,
    id: &str,
) -> Result<(Uuid, Arc<CatalogBrowser>), Response> {
    let session = Uuid::parse_str(id)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID").into_response())?;

    state
        .session(session)
        .map(|browser| (session, browser))
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Session not found or expired").into_response())
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (session, browser) = match find_session(&state, &id) {
        Ok(found) => found,
        Err(response) => return response,
    };

    match browser
        .search_debounced(&query.q, state.search_debounce)
        .await
    {
        Some(view) => Html(render_browser(&view, session)).into_response(),
        // Superseded by a newer search; htmx leaves the grid alone on 204
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

async fn goto_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let (session, browser) = match find_session(&state, &id) {
        Ok(found) => found,
        Err(response) => return response,
    };

    let requested = query.page.and_then(|p| p.trim().parse::<i64>().ok());
    let view = match requested {
        Some(page) => browser.goto(page).await,
        None => browser.current().await,
    };
    Html(render_browser(&view, session)).into_response()
}

async fn next_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match find_session(&state, &id) {
        Ok((session, browser)) => Html(render_browser(&browser.next().await, session)).into_response(),
        Err(response) => response,
    }
}

async fn prev_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match find_session(&state, &id) {
        Ok((session, browser)) => Html(render_browser(&browser.prev().await, session)).into_response(),
        Err(response) => response,
    }
}
