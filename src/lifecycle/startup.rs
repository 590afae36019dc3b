//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate the site description
//! - Assemble the template cache and the route table
//! - Start the optional metrics exporter
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when the cache is complete)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_site_config, ConfigError, ServerArgs};
use crate::http::{HttpServer, ServerOptions};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics::init_metrics;
use crate::routing::RegistryError;
use crate::templates::{AssemblyError, TemplateAssembler};

/// Fatal startup and serving failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("fatal error loading config file: {0}")]
    Config(#[from] ConfigError),

    #[error("fatal error registering routes: {0}")]
    Registry(#[from] RegistryError),

    #[error("fatal error caching templates: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

impl StartupError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Config(_) | StartupError::Registry(_) => 2,
            StartupError::Assembly(_) => 3,
            StartupError::Bind { .. } | StartupError::Serve(_) => 4,
            StartupError::Metrics(_) => 5,
        }
    }
}

/// Everything up to, but not including, binding the port.
pub fn prepare(args: &ServerArgs) -> Result<HttpServer, StartupError> {
    let site = Arc::new(load_site_config(&args.config)?);
    tracing::info!(
        config = ?args.config,
        title = %site.title,
        pages = site.pages.len(),
        served = site.served_pages().count(),
        "Configuration loaded"
    );

    let cache = Arc::new(TemplateAssembler::new(&args.templates).assemble(&site)?);
    tracing::info!(entries = cache.len(), "Template cache ready");

    let options = ServerOptions {
        favicon: args.favicon.clone(),
        ..ServerOptions::default()
    };
    Ok(HttpServer::new(site, cache, options)?)
}

/// Start the server and run until a shutdown signal.
pub async fn run(args: ServerArgs) -> Result<(), StartupError> {
    tracing::info!(
        app = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Starting"
    );

    let server = prepare(&args)?;

    if let Some(addr) = args.metrics_address {
        init_metrics(addr)?;
    }

    let addr = args.listen_address();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("Server starting on http://localhost:{}", args.port);

    server
        .run(listener, shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;
    use std::fs;
    use std::path::Path;

    fn args(config: &Path) -> ServerArgs {
        let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        ServerArgs::parse_from([
            OsStr::new("json-site-server"),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("--templates"),
            templates.as_os_str(),
        ])
    }

    #[test]
    fn test_prepare_sample_site() {
        let config = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.json");
        let server = prepare(&args(&config)).unwrap();
        assert!(!server.routes().is_empty());
    }

    #[test]
    fn test_page_without_content_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"title": "x", "pages": [{"route": "GET /", "title": "Home", "create_handler": true}]}"#,
        )
        .unwrap();

        let err = prepare(&args(&config)).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_capture_style_route_aborts_without_panic() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"pages": [{"route": "GET /:slug", "create_handler": true, "template": "pages/home.html"}]}"#,
        )
        .unwrap();

        let Err(err) = prepare(&args(&config)) else {
            panic!("route with a ':' segment was accepted");
        };
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_broken_page_template_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(
            &config,
            r#"{"pages": [{"route": "GET /", "create_handler": true, "template": "pages/missing.html"}]}"#,
        )
        .unwrap();

        let err = prepare(&args(&config)).unwrap_err();
        assert!(matches!(err, StartupError::Assembly(AssemblyError::PageTemplate { .. })));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_run_fails_before_binding() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"pages": [{"route": "GET /", "create_handler": true}]}"#).unwrap();

        // Port 1 is privileged; reaching the bind step would give a Bind error instead.
        let mut args = args(&config);
        args.port = 1;
        let err = run(args).await.unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }
}
