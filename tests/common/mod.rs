//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use json_site_server::config::load_site_config;
use json_site_server::config::loader::parse_site_config;
use json_site_server::http::{HttpServer, ServerOptions};
use json_site_server::{Shutdown, SiteConfig, TemplateAssembler};
use tokio::net::TcpListener;

pub fn repo_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
}

/// A running server on an ephemeral port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    /// Serve the sample `config.json`.
    pub async fn start() -> Self {
        Self::serve(load_site_config(&repo_path("config.json")).unwrap()).await
    }

    /// A server for an inline site description, using the repo templates.
    pub async fn start_with(config: &str) -> Self {
        Self::serve(parse_site_config(config).unwrap()).await
    }

    async fn serve(site: SiteConfig) -> Self {
        let site = Arc::new(site);
        let cache = TemplateAssembler::new(repo_path("templates"))
            .assemble(&site)
            .unwrap();
        let server = HttpServer::new(site, Arc::new(cache), ServerOptions::default()).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let signalled = shutdown.signalled();
        tokio::spawn(async move {
            let _ = server.run(listener, signalled).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
