//! Per-request site views.
//!
//! # Data Flow
//! ```text
//! SiteConfig.pages
//!     → menu.rs (filter + stable sort, once per handler at startup)
//!
//! request
//!     → page_data.rs (site + page + theme + menu [+ error])
//!     → template execution
//! ```

pub mod menu;
pub mod page_data;

pub use menu::menu_pages;
pub use page_data::{ErrorPayload, PageData};
