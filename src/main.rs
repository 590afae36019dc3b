//! JSON-described website server
//!
//! Serves a small website whose pages, menu and per-page content are
//! described by a single JSON file.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.json ──▶ config (load + validate)
//!                        │
//!                        ▼
//!   templates/  ──▶ templates (assemble one template set per route)
//!                        │
//!                        ▼
//!                   routing (one handler per served page)
//!                        │
//!   Client Request ──▶ http (middleware → dispatch → render) ──▶ Client Response
//!
//!   Cross-cutting: observability (logging, metrics), lifecycle (startup/shutdown)
//! ```
//!
//! # Exit Codes
//!
//! - 1: logging could not be initialized
//! - 2: configuration or route registration failed
//! - 3: template assembly failed
//! - 4: bind or serve failed
//! - 5: metrics exporter failed

use std::process::ExitCode;

use clap::Parser;

use json_site_server::config::ServerArgs;
use json_site_server::lifecycle;
use json_site_server::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let args = ServerArgs::parse();

    if let Err(e) = init_logging(&args.log_sink) {
        eprintln!("fatal error initializing logging: {e}");
        return ExitCode::from(1);
    }

    match lifecycle::run(args).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server terminated");
            ExitCode::from(e.exit_code())
        }
    }
}
