//! Route registration.
//!
//! # Responsibilities
//! - Bind every served page to a handler carrying its route, page,
//!   cached template key and menu snapshot
//! - Register the fixed favicon and theme-toggle endpoints
//! - Answer everything else with the negotiated not-found response
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pages sharing a path are merged into one method router
//! - Conflicts are reported as errors instead of router panics

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    response::Response,
    routing::{get, get_service, MethodRouter},
    Router,
};
use thiserror::Error;
use tower_http::services::ServeFile;

use crate::config::schema::{Page, SiteConfig};
use crate::http::dispatch::PageHandler;
use crate::http::response::ErrorPages;
use crate::http::theme::toggle_theme;
use crate::routing::route::{Route, RouteParseError};
use crate::routing::{FAVICON_PATH, THEME_TOGGLE_PATH};
use crate::site::menu_pages;
use crate::templates::TemplateCache;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Route(#[from] RouteParseError),

    #[error("route '{route}' is declared more than once")]
    DuplicateRoute { route: String },

    #[error("route '{route}' is reserved by the server")]
    ReservedRoute { route: String },

    #[error("route '{route}' cannot be routed by method")]
    UnroutableMethod { route: String },
}

/// The immutable route table.
#[derive(Debug)]
pub struct RouteRegistry {
    routes: Vec<Route>,
    router: Router,
}

impl RouteRegistry {
    pub fn build(
        site: Arc<SiteConfig>,
        cache: Arc<TemplateCache>,
        favicon: &Path,
    ) -> Result<Self, RegistryError> {
        let menu: Arc<[Page]> = menu_pages(&site.pages).into();
        let errors = ErrorPages::new(site.clone(), cache.clone(), menu.clone());

        let mut seen = HashSet::new();
        let mut routes = Vec::new();
        let mut by_path: BTreeMap<String, MethodRouter<ErrorPages>> = BTreeMap::new();

        for page in site.served_pages() {
            let route = Route::parse(&page.route)?;
            if route.path == FAVICON_PATH || route.path == THEME_TOGGLE_PATH {
                return Err(RegistryError::ReservedRoute { route: route.key() });
            }
            if !seen.insert(route.key()) {
                return Err(RegistryError::DuplicateRoute { route: route.key() });
            }
            let filter = route
                .method_filter()
                .ok_or_else(|| RegistryError::UnroutableMethod { route: route.key() })?;

            let handler = Arc::new(PageHandler::new(
                route.clone(),
                page.clone(),
                site.clone(),
                cache.clone(),
                menu.clone(),
                errors.clone(),
            ));
            let method_router = by_path.remove(&route.path).unwrap_or_else(MethodRouter::new);
            by_path.insert(
                route.path.clone(),
                method_router.on(filter, move |request: Request| async move {
                    handler.respond(request.uri().path(), request.headers())
                }),
            );

            tracing::info!(route = %route, title = %page.title, "Handler registered");
            routes.push(route);
        }

        let mut router = Router::new();
        for (path, method_router) in by_path {
            router = router.route(&path, method_router);
        }
        let router = router
            .route(FAVICON_PATH, get_service(ServeFile::new(favicon)))
            .route(THEME_TOGGLE_PATH, get(toggle_theme).post(toggle_theme))
            .fallback(not_found)
            .with_state(errors);

        Ok(Self { routes, router })
    }

    /// Page routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Requests matching no registered route.
async fn not_found(State(errors): State<ErrorPages>, request: Request) -> Response {
    let path = request.uri().path();
    tracing::debug!(path = %path, "No route matched");
    errors.not_found(request.headers(), path, None)
}
