//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, selectable sink)
//!     → metrics.rs (request counters and latency)
//!
//! Consumers:
//!     → Log sink (stdout, stderr, file, or discarded)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
