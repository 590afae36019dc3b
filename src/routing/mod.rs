//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     Page.route ("GET /about")
//!     → route.rs (parse METHOD PATH)
//!     → registry.rs (one handler per served page + fixed endpoints)
//!     → Freeze as immutable axum Router
//!
//! Incoming Request (method, path)
//!     → exact path match → page handler (http::dispatch)
//!     → no match → negotiated not-found
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact path matching only
//! - Deterministic: same input always matches same route

pub mod registry;
pub mod route;

pub use registry::{RegistryError, RouteRegistry};
pub use route::{Route, RouteParseError};

pub const FAVICON_PATH: &str = "/favicon.ico";
pub const THEME_TOGGLE_PATH: &str = "/set-theme";
