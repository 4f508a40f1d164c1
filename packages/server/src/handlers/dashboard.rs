use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::page::PageContext;
use crate::routes::names::route;
use crate::state::AppState;

/// `/` always lands on the dashboard.
pub async fn home() -> Response {
    let target = route("page.dashboard", &[]).unwrap_or_else(|| "/dashboard".into());
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

#[instrument(skip(state, page))]
pub async fn show(State(state): State<AppState>, page: PageContext) -> Result<Response, AppError> {
    let brand_count = state.brands.count().await?;
    page.render("Dashboard", json!({ "brand_count": brand_count }))
}
