//! Content-negotiated error responses.
//!
//! # Responsibilities
//! - Choose JSON or HTML from the `Accept` header
//! - Render HTML errors through the cached error templates, so error
//!   pages keep the site's header, footer and theme
//!
//! # Design Decisions
//! - JSON bodies are always `{"error": "<message>"}`
//! - A missing error template yields a plain-text 500, never a panic

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::config::schema::{Page, SiteConfig};
use crate::http::theme::Theme;
use crate::site::{ErrorPayload, PageData};
use crate::templates::{describe, TemplateCache, TemplateKey};

pub const NOT_FOUND_MESSAGE: &str = "not found";

/// True when the client asked for JSON.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Renders not-found and internal-error responses.
#[derive(Debug, Clone)]
pub struct ErrorPages {
    site: Arc<SiteConfig>,
    cache: Arc<TemplateCache>,
    menu: Arc<[Page]>,
}

impl ErrorPages {
    pub fn new(site: Arc<SiteConfig>, cache: Arc<TemplateCache>, menu: Arc<[Page]>) -> Self {
        Self { site, cache, menu }
    }

    /// 404 for `path`. `page` is the handler's page when there is one.
    pub fn not_found(&self, headers: &HeaderMap, path: &str, page: Option<&Page>) -> Response {
        if wants_json(headers) {
            return json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
        }
        let payload = ErrorPayload {
            code: "error_404",
            status: StatusCode::NOT_FOUND.as_u16(),
            message: format!("the resource '{path}' was not found."),
        };
        self.render(StatusCode::NOT_FOUND, &TemplateKey::NotFound, headers, page, payload)
    }

    /// 500 carrying `message`.
    pub fn internal_error(&self, headers: &HeaderMap, page: Option<&Page>, message: &str) -> Response {
        if wants_json(headers) {
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, message);
        }
        let payload = ErrorPayload {
            code: "error_500",
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            message: format!("error in server {message}"),
        };
        self.render(
            StatusCode::INTERNAL_SERVER_ERROR,
            &TemplateKey::InternalError,
            headers,
            page,
            payload,
        )
    }

    fn render(
        &self,
        status: StatusCode,
        key: &TemplateKey,
        headers: &HeaderMap,
        page: Option<&Page>,
        payload: ErrorPayload,
    ) -> Response {
        let Some(template) = self.cache.get(key) else {
            tracing::error!(template = %key, "Error template missing from cache");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Critical Error: {status} template is missing"),
            )
                .into_response();
        };

        let data = PageData::new(&self.site, page, Theme::from_headers(headers), &self.menu)
            .with_error(payload);
        match template.render(&data) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!(template = %key, error = %describe(&e), "Error template execution failed");
                (status, status.canonical_reason().unwrap_or_default().to_string()).into_response()
            }
        }
    }
}
