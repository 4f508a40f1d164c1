use axum::extract::State;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::form::FormPayload;
use crate::extractors::page::PageContext;
use crate::flash::{self, Flash};
use crate::models::auth::LoginInput;
use crate::routes::names::route;
use crate::state::AppState;
use crate::utils::hash;

#[instrument(skip(page))]
pub async fn login_page(page: PageContext) -> Result<Response, AppError> {
    page.render("Auth/Login", json!({}))
}

/// Check the submitted credentials against the configured administrator.
///
/// Issuing a session belongs to the authentication layer in front of this
/// app; a successful check only sends the user on to the dashboard.
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: FormPayload,
) -> Result<Response, AppError> {
    let input = LoginInput::from_payload(&payload)?;
    let auth = &state.config.auth;

    if auth.admin_password_hash.is_empty() {
        tracing::warn!("Login attempted but no administrator password hash is configured");
        return Err(AppError::InvalidCredentials);
    }

    let email_matches = input.email.eq_ignore_ascii_case(auth.admin_email.trim());
    let password_matches = hash::verify_password(&input.password, &auth.admin_password_hash)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !(email_matches && password_matches) {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(email = %input.email, "Administrator signed in");
    let target = route("page.dashboard", &[]).unwrap_or_else(|| "/dashboard".into());
    Ok(flash::redirect(jar, &target, Flash::success("Welcome back.")))
}
