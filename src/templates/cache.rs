//! Assembled, executable templates keyed by route.

use std::collections::HashMap;
use std::fmt;

use tera::{Context, Tera};

use crate::site::PageData;

/// Lookup key for a cached template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// A page route, `METHOD PATH`.
    Route(String),
    NotFound,
    InternalError,
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKey::Route(route) => f.write_str(route),
            TemplateKey::NotFound => f.write_str("error_404"),
            TemplateKey::InternalError => f.write_str("error_500"),
        }
    }
}

/// A template set bound to the name it is executed through.
#[derive(Debug, Clone)]
pub struct CachedTemplate {
    set: Tera,
    entry: String,
}

impl CachedTemplate {
    pub(crate) fn new(set: Tera, entry: impl Into<String>) -> Self {
        Self {
            set,
            entry: entry.into(),
        }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Execute the template with the given view.
    pub fn render(&self, data: &PageData<'_>) -> tera::Result<String> {
        let context = Context::from_serialize(data)?;
        self.set.render(&self.entry, &context)
    }
}

/// Immutable map from route to template, built once at startup.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: HashMap<TemplateKey, CachedTemplate>,
}

impl TemplateCache {
    pub(crate) fn insert(&mut self, key: TemplateKey, template: CachedTemplate) {
        self.entries.insert(key, template);
    }

    pub fn get(&self, key: &TemplateKey) -> Option<&CachedTemplate> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &TemplateKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Total entries, error pages included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of page routes, error pages excluded.
    pub fn page_count(&self) -> usize {
        self.entries
            .keys()
            .filter(|k| matches!(k, TemplateKey::Route(_)))
            .count()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TemplateKey> {
        self.entries.keys()
    }
}
