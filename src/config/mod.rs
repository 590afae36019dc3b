//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.json
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteConfig (validated, immutable)
//!     → shared via Arc with the assembler and every handler
//!
//! command line / environment
//!     → process.rs (port, log sink, paths)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal documents
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod process;
pub mod schema;
pub mod validation;

pub use loader::{load_site_config, ConfigError};
pub use process::ServerArgs;
pub use schema::{Author, ContentBlock, ContentSource, Page, SiteConfig};
pub use validation::ValidationError;
