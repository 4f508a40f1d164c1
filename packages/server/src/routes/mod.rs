pub mod names;

use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::services::ServeDir;

use crate::config::StorageConfig;
use crate::handlers;
use crate::middleware::redirect_back_on_failure;
use crate::state::AppState;

pub fn web_routes(storage: &StorageConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::dashboard::home))
        .route("/dashboard", get(handlers::dashboard::show))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .nest("/brands", brand_routes())
        .nest_service(
            storage.url_prefix.trim_end_matches('/'),
            ServeDir::new(&storage.root),
        )
        .layer(middleware::from_fn(redirect_back_on_failure))
}

fn brand_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::brand::index).post(handlers::brand::store),
        )
        .route("/create", get(handlers::brand::create))
        .route(
            "/{id}",
            put(handlers::brand::update)
                .patch(handlers::brand::update)
                .post(handlers::brand::submit)
                .delete(handlers::brand::destroy),
        )
        .route("/{id}/edit", get(handlers::brand::edit))
        .layer(handlers::brand::brand_body_limit())
}
