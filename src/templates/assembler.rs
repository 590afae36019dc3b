//! Startup assembly of the per-route template cache.
//!
//! # Responsibilities
//! - Parse the shared artifacts once into a master set
//! - Clone the master set per served page and add its content
//! - Synthesize the `main` block for block-driven pages
//! - Build the not-found and internal-error entries
//!
//! # Design Decisions
//! - Clones are deep copies; nothing added to one is visible to another
//! - Any failure aborts assembly; there is no partially built cache
//! - Synthesized sources only interpolate registry constants, block
//!   indices and a layout name already present in the master set

use std::fs;
use std::path::{Path, PathBuf};

use tera::Tera;
use thiserror::Error;

use crate::config::schema::{ContentBlock, ContentSource, Page, SiteConfig};
use crate::config::validation::is_valid_layout_name;
use crate::routing::route::{Route, RouteParseError};
use crate::templates::blocks::{self, BLOCKS_NAMESPACE, BLOCKS_TEMPLATE};
use crate::templates::cache::{CachedTemplate, TemplateCache, TemplateKey};
use crate::templates::{describe, filters};

pub const BASE_LAYOUT: &str = "base_layout";
pub const NOT_FOUND_TEMPLATE: &str = "errors/error_404.html";
pub const INTERNAL_ERROR_TEMPLATE: &str = "errors/error_500.html";

const SHARED_TEMPLATES: [&str; 6] = [
    "base_layout.html",
    "header.html",
    "footer.html",
    NOT_FOUND_TEMPLATE,
    INTERNAL_ERROR_TEMPLATE,
    BLOCKS_TEMPLATE,
];
const LAYOUTS_DIR: &str = "layouts";

/// Name each page's content is registered and executed under.
const PAGE_ENTRY: &str = "page.html";

/// Errors raised while assembling templates.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("error parsing shared templates in {dir:?}: {}", describe(.source))]
    Shared {
        dir: PathBuf,
        #[source]
        source: tera::Error,
    },

    #[error("error reading layouts in {path:?}: {source}")]
    Layouts {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Route(#[from] RouteParseError),

    #[error("page '{route}' declares neither 'template' nor 'custom_content'")]
    MissingContent { route: String },

    #[error("page '{route}' uses unknown layout '{layout}'")]
    UnknownLayout { route: String, layout: String },

    #[error("route '{route}' is declared more than once")]
    DuplicateRoute { route: String },

    #[error("error parsing custom content template for route {route}: {}", describe(.source))]
    BlockContent {
        route: String,
        #[source]
        source: tera::Error,
    },

    #[error("error parsing page template {path:?} for route {route}: {}", describe(.source))]
    PageTemplate {
        route: String,
        path: PathBuf,
        #[source]
        source: tera::Error,
    },
}

/// Builds the template cache from a templates directory.
#[derive(Debug, Clone)]
pub struct TemplateAssembler {
    root: PathBuf,
}

impl TemplateAssembler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Assemble one entry per served page plus the two error entries.
    pub fn assemble(&self, site: &SiteConfig) -> Result<TemplateCache, AssemblyError> {
        tracing::info!(templates = ?self.root, "Caching templates");
        let master = self.master_set()?;
        let mut cache = TemplateCache::default();

        for page in site.served_pages() {
            let route = Route::parse(&page.route)?;
            let key = TemplateKey::Route(route.key());
            if cache.contains(&key) {
                return Err(AssemblyError::DuplicateRoute { route: route.key() });
            }

            let template = self.page_template(&master, page, &route)?;
            tracing::info!(route = %route, "Template cached");
            cache.insert(key, template);
        }

        for (key, entry) in [
            (TemplateKey::NotFound, NOT_FOUND_TEMPLATE),
            (TemplateKey::InternalError, INTERNAL_ERROR_TEMPLATE),
        ] {
            cache.insert(key.clone(), CachedTemplate::new(master.clone(), entry));
            tracing::info!(route = %key, "Template cached");
        }

        Ok(cache)
    }

    /// Layouts, partials, error pages and block macros.
    fn master_set(&self) -> Result<Tera, AssemblyError> {
        let mut files: Vec<(PathBuf, Option<String>)> = SHARED_TEMPLATES
            .iter()
            .map(|name| (self.root.join(name), Some(name.to_string())))
            .collect();
        files.extend(self.layout_files()?);

        let mut master = Tera::default();
        master.register_filter("route_path", filters::route_path);
        master
            .add_template_files(files)
            .map_err(|source| AssemblyError::Shared {
                dir: self.root.clone(),
                source,
            })?;

        tracing::debug!(
            templates = ?master.get_template_names().collect::<Vec<_>>(),
            "Master template set parsed"
        );
        Ok(master)
    }

    /// Optional extra layouts under `layouts/`.
    fn layout_files(&self) -> Result<Vec<(PathBuf, Option<String>)>, AssemblyError> {
        let dir = self.root.join(LAYOUTS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let read_err = |source| AssemblyError::Layouts {
            path: dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if path.extension().is_some_and(|ext| ext == "html") {
                if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                    let name = format!("{LAYOUTS_DIR}/{file_name}");
                    files.push((path.clone(), Some(name)));
                }
            }
        }
        files.sort();
        Ok(files)
    }

    fn page_template(
        &self,
        master: &Tera,
        page: &Page,
        route: &Route,
    ) -> Result<CachedTemplate, AssemblyError> {
        let layout = resolve_layout(master, page)?;
        let mut set = master.clone();

        match page.content_source() {
            Some(ContentSource::Blocks(content)) => {
                set.add_raw_template(PAGE_ENTRY, &block_page_source(&layout, content))
                    .map_err(|source| AssemblyError::BlockContent {
                        route: route.key(),
                        source,
                    })?;
            }
            Some(ContentSource::Template(file)) => {
                let path = self.root.join(file);
                set.add_template_file(&path, Some(PAGE_ENTRY))
                    .map_err(|source| AssemblyError::PageTemplate {
                        route: route.key(),
                        path,
                        source,
                    })?;
            }
            None => {
                return Err(AssemblyError::MissingContent { route: route.key() });
            }
        }

        Ok(CachedTemplate::new(set, PAGE_ENTRY))
    }
}

/// Template name of the page's layout within the master set.
fn resolve_layout(master: &Tera, page: &Page) -> Result<String, AssemblyError> {
    let layout = page.layout.as_deref().unwrap_or(BASE_LAYOUT);
    let unknown = || AssemblyError::UnknownLayout {
        route: page.route.clone(),
        layout: layout.to_string(),
    };
    if !is_valid_layout_name(layout) {
        return Err(unknown());
    }

    [format!("{layout}.html"), format!("{LAYOUTS_DIR}/{layout}.html")]
        .into_iter()
        .find(|candidate| master.get_template_names().any(|name| name == candidate))
        .ok_or_else(unknown)
}

/// Source of the `main` block for a block-driven page: one registry macro
/// call per block, in sequence order.
fn block_page_source(layout: &str, content: &[ContentBlock]) -> String {
    let mut source = format!(
        "{{% extends \"{layout}\" %}}\n\
         {{% import \"{BLOCKS_TEMPLATE}\" as {BLOCKS_NAMESPACE} %}}\n\
         {{% block main %}}\n\
         <main class=\"container\">\n\
         <h1>{{{{ page.title }}}}</h1>\n"
    );
    for (index, block) in content.iter().enumerate() {
        let fragment = blocks::fragment_for(&block.kind);
        source.push_str(&format!(
            "{{{{ {BLOCKS_NAMESPACE}::{fragment}(component=page.custom_content.{index}) }}}}\n"
        ));
    }
    source.push_str("</main>\n{% endblock main %}\n");
    source
}
