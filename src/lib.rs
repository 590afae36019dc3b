//! JSON-described website server library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod site;
pub mod templates;

pub use config::schema::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use templates::{TemplateAssembler, TemplateCache};
