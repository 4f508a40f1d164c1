use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{Method, StatusCode, header, request::Parts},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::flash;
use crate::state::AppState;
use crate::views::{INERTIA_HEADER, LOCATION_HEADER, Page, VERSION_HEADER, Views};

/// Everything a handler needs to answer with a rendered page.
///
/// Add this as a handler parameter and finish with [`PageContext::render`].
pub struct PageContext {
    views: Arc<Views>,
    jar: CookieJar,
    url: String,
    method: Method,
    inertia: bool,
    client_version: Option<String>,
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        Ok(PageContext {
            views: state.views.clone(),
            jar: CookieJar::from_headers(headers),
            url: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_owned())
                .unwrap_or_else(|| parts.uri.path().to_owned()),
            method: parts.method.clone(),
            inertia: headers
                .get(INERTIA_HEADER)
                .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true")),
            client_version: headers
                .get(VERSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        })
    }
}

impl PageContext {
    /// Render `component` with `props`, consuming the pending flash.
    ///
    /// Client-side visits get the JSON page object; anything else gets the
    /// HTML shell. A client-side GET built against other assets gets
    /// `409 Conflict` telling it to reload.
    pub fn render(self, component: &str, props: Value) -> Result<Response, AppError> {
        if self.inertia
            && self.method == Method::GET
            && let Some(client_version) = &self.client_version
            && client_version != self.views.asset_version()
        {
            tracing::debug!(%client_version, "Stale asset version, forcing reload");
            return Ok((StatusCode::CONFLICT, [(LOCATION_HEADER, self.url)]).into_response());
        }

        let (jar, flash) = flash::take(self.jar);

        let mut props = match props {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other)]),
        };
        props.insert(
            "flash".into(),
            serde_json::to_value(flash)
                .map_err(|e| AppError::Internal(format!("Failed to serialize flash: {e}")))?,
        );

        let page = Page {
            component: component.to_string(),
            props: Value::Object(props),
            url: self.url,
            version: self.views.asset_version().to_string(),
        };

        if self.inertia {
            return Ok((
                jar,
                [(INERTIA_HEADER, "true"), ("vary", "X-Inertia")],
                Json(page),
            )
                .into_response());
        }

        let html = self
            .views
            .render_shell(&page)
            .map_err(|e| AppError::Internal(format!("Failed to render page shell: {e}")))?;

        Ok((jar, [(header::VARY, "X-Inertia")], Html(html)).into_response())
    }
}
