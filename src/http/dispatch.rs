//! Per-page request dispatch.
//!
//! # Request States
//! ```text
//! Received ──path == bound path──▶ PathValidated ──cache hit──▶ TemplateFound ──render ok──▶ Executed
//!    │                                  │                             │
//!    └── mismatch ──▶ NotFound          └── miss ──▶ InternalError    └── error ──▶ InternalError
//! ```
//!
//! # Design Decisions
//! - Exact string comparison on the path, no prefix or wildcard matching
//! - A cache miss is an assembly inconsistency, reported as a 500
//! - Failures are per request; nothing here can take the server down

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::config::schema::{Page, SiteConfig};
use crate::http::response::ErrorPages;
use crate::http::theme::Theme;
use crate::observability::metrics;
use crate::routing::route::Route;
use crate::site::PageData;
use crate::templates::{describe, TemplateCache, TemplateKey};

/// Reasons a page request did not produce its page.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("requested path {path} is not served by {route}")]
    RouteMismatch { route: String, path: String },

    #[error("template for route '{route}' not found in cache")]
    MissingTemplate { route: String },

    #[error("template execution failed for {route}")]
    Render {
        route: String,
        #[source]
        source: tera::Error,
    },
}

/// Handler state for one served page, built once at startup.
#[derive(Debug)]
pub struct PageHandler {
    route: Route,
    key: TemplateKey,
    page: Page,
    site: Arc<SiteConfig>,
    cache: Arc<TemplateCache>,
    menu: Arc<[Page]>,
    errors: ErrorPages,
}

impl PageHandler {
    pub fn new(
        route: Route,
        page: Page,
        site: Arc<SiteConfig>,
        cache: Arc<TemplateCache>,
        menu: Arc<[Page]>,
        errors: ErrorPages,
    ) -> Self {
        Self {
            key: TemplateKey::Route(route.key()),
            route,
            page,
            site,
            cache,
            menu,
            errors,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Run the state machine up to the rendered document.
    pub fn render(&self, path: &str, theme: Theme) -> Result<String, DispatchError> {
        if path != self.route.path {
            return Err(DispatchError::RouteMismatch {
                route: self.route.key(),
                path: path.to_string(),
            });
        }

        let template = self
            .cache
            .get(&self.key)
            .ok_or_else(|| DispatchError::MissingTemplate {
                route: self.route.key(),
            })?;

        let data = PageData::new(&self.site, Some(&self.page), theme, &self.menu);
        template.render(&data).map_err(|source| DispatchError::Render {
            route: self.route.key(),
            source,
        })
    }

    /// Produce the HTTP response for a request on `path`.
    pub fn respond(&self, path: &str, headers: &HeaderMap) -> Response {
        let start = Instant::now();
        tracing::debug!(route = %self.route, path = %path, "Handling page request");

        let response = match self.render(path, Theme::from_headers(headers)) {
            Ok(html) => Html(html).into_response(),
            Err(DispatchError::RouteMismatch { .. }) => {
                tracing::warn!(route = %self.route, path = %path, "Requested path is not served here");
                self.errors.not_found(headers, path, Some(&self.page))
            }
            Err(err) => {
                tracing::error!(route = %self.route, error = %describe(&err), "Page render failed");
                self.errors.internal_error(headers, Some(&self.page), &err.to_string())
            }
        };

        metrics::record_request(&self.route.key(), response.status().as_u16(), start);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue, StatusCode};
    use std::fs;
    use std::path::Path;

    use crate::site::menu_pages;
    use crate::templates::TemplateAssembler;

    fn repo_templates() -> &'static Path {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
    }

    fn handler_for(site: SiteConfig, cache: TemplateCache, index: usize) -> PageHandler {
        let site = Arc::new(site);
        let cache = Arc::new(cache);
        let menu: Arc<[Page]> = menu_pages(&site.pages).into();
        let page = site.pages[index].clone();
        let errors = ErrorPages::new(site.clone(), cache.clone(), menu.clone());
        PageHandler::new(Route::parse(&page.route).unwrap(), page, site, cache, menu, errors)
    }

    fn about_site() -> SiteConfig {
        SiteConfig {
            title: "Demo".into(),
            pages: vec![Page {
                route: "GET /about".into(),
                title: "About us".into(),
                create_handler: true,
                show_in_menu: true,
                template: Some("pages/about.html".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_success() {
        let site = about_site();
        let cache = TemplateAssembler::new(repo_templates()).assemble(&site).unwrap();
        let handler = handler_for(site, cache, 0);

        let html = handler.render("/about", Theme::Dark).unwrap();
        assert!(html.contains("About us"));
        assert!(html.contains("data-theme=\"dark\""));
    }

    #[test]
    fn test_path_mismatch() {
        let site = about_site();
        let cache = TemplateAssembler::new(repo_templates()).assemble(&site).unwrap();
        let handler = handler_for(site, cache, 0);

        assert!(matches!(
            handler.render("/about/", Theme::Light),
            Err(DispatchError::RouteMismatch { .. })
        ));
        assert!(matches!(
            handler.render("/About", Theme::Light),
            Err(DispatchError::RouteMismatch { .. })
        ));

        let response = handler.respond("/about/extra", &HeaderMap::new());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cache_miss_is_internal_error() {
        let site = about_site();
        let handler = handler_for(site, TemplateCache::default(), 0);

        assert!(matches!(
            handler.render("/about", Theme::Light),
            Err(DispatchError::MissingTemplate { .. })
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let response = handler.respond("/about", &headers);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_execution_failure_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        copy_dir(repo_templates(), dir.path());
        fs::write(
            dir.path().join("pages/broken.html"),
            "{% extends \"base_layout.html\" %}{% block main %}{{ page.no_such_field.deeper }}{% endblock main %}",
        )
        .unwrap();

        let mut site = about_site();
        site.pages[0].template = Some("pages/broken.html".into());
        let cache = TemplateAssembler::new(dir.path()).assemble(&site).unwrap();
        let handler = handler_for(site, cache, 0);

        let err = handler.render("/about", Theme::Light).unwrap_err();
        assert!(matches!(err, DispatchError::Render { .. }));
        assert_eq!(err.to_string(), "template execution failed for GET /about");

        let response = handler.respond("/about", &HeaderMap::new());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn copy_dir(from: &Path, to: &Path) {
        for entry in fs::read_dir(from).unwrap() {
            let entry = entry.unwrap();
            let target = to.join(entry.file_name());
            if entry.file_type().unwrap().is_dir() {
                fs::create_dir_all(&target).unwrap();
                copy_dir(&entry.path(), &target);
            } else {
                fs::copy(entry.path(), target).unwrap();
            }
        }
    }
}
