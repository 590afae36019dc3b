//! Template assembly subsystem.
//!
//! # Data Flow
//! ```text
//! templates/ (base layout, header, footer, errors, components)
//!     → assembler.rs (master set, parsed once)
//!     → per served page: clone master
//!         + page template file, or
//!         + synthesized main block (blocks.rs registry)
//!     → cache.rs (TemplateCache, immutable)
//!     → shared via Arc with the route registry
//! ```
//!
//! # Design Decisions
//! - Built once before the listener binds, read-only afterwards
//! - Block dispatch goes through a closed registry, never through
//!   user-provided template text

pub mod assembler;
pub mod blocks;
pub mod cache;
pub mod filters;

pub use assembler::{AssemblyError, TemplateAssembler};
pub use cache::{CachedTemplate, TemplateCache, TemplateKey};

/// Render an error with its source chain, `outer: inner: root`.
///
/// Tera keeps the useful detail (parse position, missing variable) in
/// the sources rather than the top-level message.
pub fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "no file");
        let err = tera::Error::chain("Failed to render 'page.html'", inner);
        assert_eq!(describe(&err), "Failed to render 'page.html': no file");
    }
}
