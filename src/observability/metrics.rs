//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): responses by route, status
//! - `site_request_duration_seconds` (histogram): render latency by route
//!
//! Recording is a no-op until a recorder is installed, so handlers record
//! unconditionally and the exporter stays optional.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "site_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("site_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}
