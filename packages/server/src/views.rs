//! Server side of the page bridge.
//!
//! Handlers name a page component and its props. The client renders it; the
//! server only ships the page object, as JSON for client-side visits or inside
//! an HTML shell on the first load.

use minijinja::{Environment, ErrorKind, context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ViewsConfig;

/// Marks a client-side visit; echoed back on page responses.
pub const INERTIA_HEADER: &str = "x-inertia";
/// Asset version the client was built against.
pub const VERSION_HEADER: &str = "x-inertia-version";
/// Where a client holding stale assets must reload from.
pub const LOCATION_HEADER: &str = "x-inertia-location";

const APP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{ title }}</title>
    <script type="module" src="{{ entry_script }}" defer></script>
</head>
<body>
    <div id="app" data-page="{{ page }}"></div>
</body>
</html>
"#;

/// The page object exchanged with the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub component: String,
    pub props: Value,
    pub url: String,
    pub version: String,
}

pub struct Views {
    env: Environment<'static>,
    title: String,
    entry_script: String,
    asset_version: String,
}

impl Views {
    pub fn new(config: &ViewsConfig) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("app.html", APP_TEMPLATE)?;

        Ok(Self {
            env,
            title: config.title.clone(),
            entry_script: config.entry_script.clone(),
            asset_version: config.asset_version.clone(),
        })
    }

    pub fn asset_version(&self) -> &str {
        &self.asset_version
    }

    /// Render the full HTML document carrying `page` for the first load.
    pub fn render_shell(&self, page: &Page) -> Result<String, minijinja::Error> {
        let page_json = serde_json::to_string(page)
            .map_err(|e| minijinja::Error::new(ErrorKind::BadSerialization, e.to_string()))?;

        self.env.get_template("app.html")?.render(context! {
            title => &self.title,
            entry_script => &self.entry_script,
            page => page_json,
        })
    }
}
