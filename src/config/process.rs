//! Process-level settings from the command line and environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::observability::logging::LogSink;

pub const DEFAULT_PORT: u16 = 8888;

/// Server process arguments. Every flag falls back to an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "json-site-server")]
#[command(about = "Serve a website described by a JSON document", long_about = None)]
#[command(version)]
pub struct ServerArgs {
    /// TCP port to listen on (1-65535).
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Log sink: stdout, stderr, DISCARD or a file path.
    #[arg(long = "log-file", env = "LOG_FILE", default_value = "stderr")]
    pub log_sink: LogSink,

    /// Site description document.
    #[arg(short, long, env = "SITE_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Directory holding layouts, partials, components and page templates.
    #[arg(short, long, env = "TEMPLATES_DIR", default_value = "templates")]
    pub templates: PathBuf,

    /// File served at /favicon.ico.
    #[arg(long, default_value = "favicon.ico")]
    pub favicon: PathBuf,

    /// Prometheus exporter address; metrics are not exported when unset.
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<SocketAddr>,
}

impl ServerArgs {
    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
