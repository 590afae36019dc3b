//! Site description validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every served page has a parseable route and renderable content
//! - Detect duplicate and reserved routes before the router is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before the template set is assembled

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::routing::route::{Route, RouteParseError};
use crate::routing::{FAVICON_PATH, THEME_TOGGLE_PATH};

/// A single semantic problem in the site description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("page #{index}: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteParseError,
    },

    #[error("page '{route}' declares neither 'template' nor 'custom_content'")]
    MissingContent { route: String },

    #[error("route '{route}' is declared more than once")]
    DuplicateRoute { route: String },

    #[error("route '{route}' is reserved by the server")]
    ReservedRoute { route: String },

    #[error("page '{route}' has invalid layout name '{layout}'")]
    InvalidLayout { route: String, layout: String },
}

/// Check the site description. Only served pages are held to the rules;
/// drafts and handler-less entries may be incomplete.
pub fn validate_site(site: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, page) in site.pages.iter().enumerate() {
        if !page.is_served() {
            continue;
        }

        match Route::parse(&page.route) {
            Ok(route) => {
                if route.path == FAVICON_PATH || route.path == THEME_TOGGLE_PATH {
                    errors.push(ValidationError::ReservedRoute { route: route.key() });
                } else if !seen.insert(route.key()) {
                    errors.push(ValidationError::DuplicateRoute { route: route.key() });
                }
            }
            Err(source) => errors.push(ValidationError::Route { index, source }),
        }

        if page.content_source().is_none() {
            errors.push(ValidationError::MissingContent {
                route: page.route.clone(),
            });
        }

        if let Some(layout) = &page.layout {
            if !is_valid_layout_name(layout) {
                errors.push(ValidationError::InvalidLayout {
                    route: page.route.clone(),
                    layout: layout.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub(crate) fn is_valid_layout_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
