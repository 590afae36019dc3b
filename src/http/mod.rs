//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → [routing registry picks the page handler]
//!     → dispatch.rs (path check, cache lookup, render)
//!     → response.rs (negotiated error pages)
//!     → Send to client
//!
//! theme.rs resolves the light/dark cookie for every render and serves
//! the toggle endpoint.
//! ```

pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;
pub mod theme;

pub use dispatch::{DispatchError, PageHandler};
pub use request::X_REQUEST_ID;
pub use response::ErrorPages;
pub use server::{HttpServer, ServerOptions};
pub use theme::Theme;
