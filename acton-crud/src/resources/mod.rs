//! Static assets for the edit screen
//!
//! The date/time picker script and stylesheet are compiled into the binary
//! and served from `{base_path}/{resource_path}?res=<name>`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// An embedded static file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    /// Name used in the `res` query parameter
    pub name: &'static str,
    /// MIME type sent with the body
    pub content_type: &'static str,
    /// File contents
    pub body: &'static str,
}

const DATETIMEPICKER_JS: Asset = Asset {
    name: "datetimepicker.js",
    content_type: "application/javascript",
    body: include_str!("../../res/datetimepicker.js"),
};

const DATETIMEPICKER_CSS: Asset = Asset {
    name: "datetimepicker.css",
    content_type: "text/css",
    body: include_str!("../../res/datetimepicker.css"),
};

const ASSETS: [Asset; 2] = [DATETIMEPICKER_JS, DATETIMEPICKER_CSS];

/// Find an embedded asset by name
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Asset> {
    ASSETS.iter().find(|asset| asset.name == name)
}

/// URLs of the registered picker assets, handed to edit pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrls {
    /// Script URL
    pub script: String,
    /// Stylesheet URL
    pub style: String,
}

/// The resource endpoint, registered once per admin router
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    route: String,
    urls: AssetUrls,
}

impl AssetRegistry {
    /// Register the asset endpoint below `base_path`
    #[must_use]
    pub fn register(base_path: &str, resource_path: &str) -> Self {
        let route = format!("{base_path}/{}", resource_path.trim_matches('/'));
        let urls = AssetUrls {
            script: format!("{route}?res={}", DATETIMEPICKER_JS.name),
            style: format!("{route}?res={}", DATETIMEPICKER_CSS.name),
        };
        tracing::debug!(route = %route, "Registered date/time picker assets");
        Self { route, urls }
    }

    /// Route path serving the assets
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Asset URLs
    #[must_use]
    pub const fn urls(&self) -> &AssetUrls {
        &self.urls
    }
}

/// Response for the asset called `name`; 404 if there is none
#[must_use]
pub fn serve(name: &str) -> Response {
    lookup(name).map_or_else(
        || {
            tracing::debug!(res = %name, "Unknown asset requested");
            (StatusCode::NOT_FOUND, "Not found").into_response()
        },
        |asset| {
            (
                [
                    (header::CONTENT_TYPE, asset.content_type),
                    (header::CACHE_CONTROL, "public, max-age=86400"),
                ],
                asset.body,
            )
                .into_response()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(
            lookup("datetimepicker.js").unwrap().content_type,
            "application/javascript"
        );
        assert_eq!(lookup("datetimepicker.css").unwrap().content_type, "text/css");
        assert!(lookup("../Cargo.toml").is_none());
    }

    #[test]
    fn test_register_urls() {
        let registry = AssetRegistry::register("/admin", "/crud-res/");
        assert_eq!(registry.route(), "/admin/crud-res");
        assert_eq!(registry.urls().script, "/admin/crud-res?res=datetimepicker.js");
        assert_eq!(registry.urls().style, "/admin/crud-res?res=datetimepicker.css");
    }

    #[test]
    fn test_serve() {
        let response = serve("datetimepicker.css");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );

        assert_eq!(serve("missing.js").status(), StatusCode::NOT_FOUND);
    }
}
