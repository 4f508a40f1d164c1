//! One-request flash messages carried by a cookie.
//!
//! A redirect attaches the flash; the next rendered page reads it into its
//! props and clears the cookie.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "storeadmin_flash";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }

    /// Hex-encoded JSON, so the value stays inside the cookie octet set.
    fn encode(&self) -> String {
        serde_json::to_vec(self).map(hex::encode).unwrap_or_default()
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = hex::decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Attach a flash to the outgoing cookies.
pub fn put(jar: CookieJar, flash: &Flash) -> CookieJar {
    let mut cookie = Cookie::new(FLASH_COOKIE, flash.encode());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Read the pending flash, if any, and schedule its removal.
pub fn take(jar: CookieJar) -> (CookieJar, Flash) {
    let Some(flash) = jar.get(FLASH_COOKIE).map(|c| Flash::decode(c.value())) else {
        return (jar, Flash::default());
    };

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash.unwrap_or_default())
}

/// `303 See Other` to `to`, carrying `flash` to the next page.
pub fn redirect(jar: CookieJar, to: &str, flash: Flash) -> Response {
    (put(jar, &flash), Redirect::to(to)).into_response()
}
