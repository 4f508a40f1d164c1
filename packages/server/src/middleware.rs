use axum::{
    extract::Request,
    http::{Method, Uri, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::FailureNotice;
use crate::flash::{self, Flash};
use crate::routes::names;

/// Turn every failed submission into a redirect back to where it came from.
///
/// Reads are left alone. For any other method, a response carrying a
/// [`FailureNotice`] is replaced by a `303` to the `Referer` (or the route's
/// form when there is none) with the notice as the error flash. Not-found
/// responses carry no notice and pass through.
pub async fn redirect_back_on_failure(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
        return next.run(req).await;
    }

    let jar = CookieJar::from_headers(req.headers());
    let back = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(referer_path)
        .or_else(|| names::back_fallback(method.as_str(), req.uri().path()))
        .unwrap_or_else(|| "/".to_string());

    let response = next.run(req).await;

    let Some(FailureNotice(message)) = response.extensions().get::<FailureNotice>().cloned()
    else {
        return response;
    };

    tracing::info!(%method, status = %response.status(), %back, "Submission failed, redirecting back");
    flash::redirect(jar, &back, Flash::error(message))
}

/// Path and query of a `Referer`, without scheme and host so a forged header
/// cannot send the browser off-site.
fn referer_path(referer: &str) -> Option<String> {
    let uri = Uri::try_from(referer).ok()?;
    let path = uri.path_and_query()?.as_str();
    (path.starts_with('/') && !path.starts_with("//")).then(|| path.to_string())
}
