//! Per-request template view.

use serde::Serialize;

use crate::config::schema::{Page, SiteConfig};
use crate::http::theme::Theme;

/// Everything a template sees. Built fresh for each request.
#[derive(Debug, Serialize)]
pub struct PageData<'a> {
    pub site: &'a SiteConfig,

    /// Absent for not-found responses that match no page at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<&'a Page>,

    pub theme: Theme,

    pub menu_pages: &'a [Page],

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl<'a> PageData<'a> {
    pub fn new(site: &'a SiteConfig, page: Option<&'a Page>, theme: Theme, menu_pages: &'a [Page]) -> Self {
        Self {
            site,
            page,
            theme,
            menu_pages,
            error: None,
        }
    }

    pub fn with_error(mut self, error: ErrorPayload) -> Self {
        self.error = Some(error);
        self
    }
}

/// Error details exposed to the error templates.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// `error_404` or `error_500`.
    pub code: &'static str,
    pub status: u16,
    pub message: String,
}
