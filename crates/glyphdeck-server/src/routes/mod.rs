pub mod api;
pub mod browse;
pub mod health;
pub mod pages;
pub mod views;

use axum::Router;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::routes())
        .merge(browse::routes())
        .merge(api::routes())
        .merge(health::routes())
        .with_state(state)
}
