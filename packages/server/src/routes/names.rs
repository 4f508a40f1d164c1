//! Named route table.
//!
//! Handlers never hard-code paths: they ask for a route by name, the way the
//! page components do on the client.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use matchit::Router;

/// One named entry of the route table.
#[derive(Debug)]
pub struct NamedRoute {
    pub name: &'static str,
    pub methods: &'static [&'static str],
    pub path: &'static str,
    /// Route a failed submission returns to when the request has no usable `Referer`.
    pub back_to: Option<&'static str>,
}

pub static ROUTES: &[NamedRoute] = &[
    NamedRoute {
        name: "home",
        methods: &["GET"],
        path: "/",
        back_to: None,
    },
    NamedRoute {
        name: "page.dashboard",
        methods: &["GET"],
        path: "/dashboard",
        back_to: None,
    },
    NamedRoute {
        name: "login",
        methods: &["GET"],
        path: "/login",
        back_to: None,
    },
    NamedRoute {
        name: "login.post",
        methods: &["POST"],
        path: "/login",
        back_to: Some("login"),
    },
    NamedRoute {
        name: "brands.index",
        methods: &["GET"],
        path: "/brands",
        back_to: None,
    },
    NamedRoute {
        name: "brands.create",
        methods: &["GET"],
        path: "/brands/create",
        back_to: None,
    },
    NamedRoute {
        name: "brands.store",
        methods: &["POST"],
        path: "/brands",
        back_to: Some("brands.create"),
    },
    NamedRoute {
        name: "brands.edit",
        methods: &["GET"],
        path: "/brands/{id}/edit",
        back_to: None,
    },
    NamedRoute {
        name: "brands.update",
        // POST carries `_method`; a spoofed DELETE is dispatched to destroy.
        methods: &["PUT", "PATCH", "POST"],
        path: "/brands/{id}",
        back_to: Some("brands.edit"),
    },
    NamedRoute {
        name: "brands.destroy",
        methods: &["DELETE"],
        path: "/brands/{id}",
        back_to: Some("brands.index"),
    },
];

/// Per-path method map, matched like the router does.
static MATCHER: LazyLock<Router<HashMap<&'static str, &'static NamedRoute>>> =
    LazyLock::new(|| {
        let mut by_path: HashMap<&'static str, HashMap<&'static str, &'static NamedRoute>> =
            HashMap::new();
        for route in ROUTES {
            let methods = by_path.entry(route.path).or_default();
            for method in route.methods {
                methods.insert(*method, route);
            }
        }

        let mut router = Router::new();
        for (path, methods) in by_path {
            router.insert(path, methods).unwrap_or_else(|e| {
                panic!("Failed to insert route '{}' into route table: {}", path, e)
            });
        }
        router
    });

/// Build the URL of a named route, filling `{param}` segments in order.
///
/// Returns `None` for an unknown name or a wrong number of parameters.
pub fn route(name: &str, params: &[&dyn fmt::Display]) -> Option<String> {
    let named = ROUTES.iter().find(|r| r.name == name)?;
    let mut params = params.iter();
    let mut url = String::new();

    for segment in named.path.split('/').skip(1) {
        url.push('/');
        if segment.starts_with('{') && segment.ends_with('}') {
            url.push_str(&params.next()?.to_string());
        } else {
            url.push_str(segment);
        }
    }

    if params.next().is_some() {
        return None;
    }
    Some(url)
}

/// Find the named route serving `method` on `path`, with its captured parameters.
pub fn resolve(method: &str, path: &str) -> Option<(&'static NamedRoute, Vec<String>)> {
    let matched = MATCHER.at(path).ok()?;
    let named = matched.value.get(method.to_ascii_uppercase().as_str())?;
    let params = matched.params.iter().map(|(_, v)| v.to_string()).collect();
    Some((*named, params))
}

/// Where a failed submission of `method path` should return to by default.
pub fn back_fallback(method: &str, path: &str) -> Option<String> {
    let (named, params) = resolve(method, path)?;
    let target = ROUTES.iter().find(|r| Some(r.name) == named.back_to)?;
    // The form may take fewer parameters than the action, e.g. destroy -> index.
    let params: Vec<&dyn fmt::Display> = params
        .iter()
        .take(placeholder_count(target.path))
        .map(|p| p as &dyn fmt::Display)
        .collect();
    route(target.name, &params)
}

fn placeholder_count(path: &str) -> usize {
    path.split('/')
        .filter(|segment| segment.starts_with('{') && segment.ends_with('}'))
        .count()
}
