//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the route table from the assembled template cache
//! - Wire up middleware (tracing, timeout, request ID, security header)
//! - Bind server to listener
//! - Stop gracefully when the shutdown future resolves

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::SiteConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::routing::{RegistryError, Route, RouteRegistry};
use crate::templates::TemplateCache;

/// Fixed transport budget for reading a request and writing its response.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Server settings that are not part of the site description.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub favicon: PathBuf,
    pub request_timeout: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            favicon: PathBuf::from("favicon.ico"),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

/// HTTP server for the site.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    routes: Vec<Route>,
}

impl HttpServer {
    /// Create a server over an assembled cache.
    pub fn new(
        site: Arc<SiteConfig>,
        cache: Arc<TemplateCache>,
        options: ServerOptions,
    ) -> Result<Self, RegistryError> {
        let registry = RouteRegistry::build(site, cache, &options.favicon)?;
        let routes = registry.routes().to_vec();
        let router = Self::build_router(registry.into_router(), &options);
        Ok(Self { router, routes })
    }

    /// Wrap the route table with all middleware layers.
    #[allow(deprecated)]
    fn build_router(routes: Router, options: &ServerOptions) -> Router {
        routes
            .layer(TimeoutLayer::new(options.request_timeout))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Page routes being served.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
