//! Glyphdeck Server - Axum server with htmx.

pub mod config;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;
