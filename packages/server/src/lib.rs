pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod utils;
pub mod views;

use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    routes::web_routes(&state.config.storage)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
