//! Site description schema.
//!
//! This module defines the structure of the JSON site document.
//! All types derive Serde traits; the same field names are exposed to
//! templates when a page is rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of the site description.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the header and the `<title>` element.
    pub title: String,

    /// Public base URL (e.g., "https://example.org").
    #[serde(rename = "baseURL")]
    pub base_url: String,

    /// Document language (e.g., "en").
    pub language: String,

    /// Default meta description.
    pub description: String,

    pub author: Author,

    /// Social links, name → URL. Ordered so rendering is deterministic.
    pub social: BTreeMap<String, String>,

    /// Footer text.
    pub footer: String,

    /// Pages in declaration order.
    pub pages: Vec<Page>,
}

impl SiteConfig {
    /// Pages that get a request handler: handler requested and not a draft.
    pub fn served_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.is_served())
    }
}

/// Site author.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// A single page entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Page {
    /// Route specifier, `METHOD PATH` (e.g., "GET /about").
    pub route: String,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Drafts are never served nor listed in the menu.
    pub draft: bool,

    /// Register a request handler for this page.
    #[serde(rename = "create_handler")]
    pub create_handler: bool,

    #[serde(rename = "showInMenu")]
    pub show_in_menu: bool,

    /// Navigation order, ascending. Ties keep declaration order.
    #[serde(rename = "menuOrder")]
    pub menu_order: i64,

    /// Free-form text available to templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Block-driven content. Takes precedence over `template`.
    #[serde(rename = "custom_content", skip_serializing_if = "Option::is_none")]
    pub custom_content: Option<Vec<ContentBlock>>,

    /// Static page template, relative to the templates directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Layout name; `base_layout` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

/// Where a page's main content comes from.
#[derive(Debug, Clone, Copy)]
pub enum ContentSource<'a> {
    Blocks(&'a [ContentBlock]),
    Template(&'a str),
}

impl Page {
    pub fn is_served(&self) -> bool {
        self.create_handler && !self.draft
    }

    pub fn in_menu(&self) -> bool {
        self.show_in_menu && !self.draft
    }

    /// Resolve the content source. `None` means the page cannot be rendered.
    pub fn content_source(&self) -> Option<ContentSource<'_>> {
        if let Some(blocks) = &self.custom_content {
            return Some(ContentSource::Blocks(blocks));
        }
        self.template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ContentSource::Template)
    }
}

/// A typed unit of structured content.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContentBlock {
    /// Type tag (e.g., "AccordionCard").
    #[serde(rename = "type")]
    pub kind: String,

    /// Payload consumed by the block's fragment.
    #[serde(rename = "keyValues")]
    pub key_values: serde_json::Map<String, serde_json::Value>,
}
