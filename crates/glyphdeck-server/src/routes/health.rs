use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    collections: usize,
    open_caches: usize,
    sessions: usize,
    parsed_collections: usize,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    // The manifest is loaded before the listener starts
    Json(ReadyResponse {
        status: "ok",
        collections: state.manifest.collections().len(),
        open_caches: state.caches.open_stores(),
        sessions: state.sessions.len(),
        parsed_collections: state.parsed_collections(),
    })
}
