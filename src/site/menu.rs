//! Navigation menu derivation.

use crate::config::schema::Page;

/// Pages shown in navigation: not drafts, flagged visible, ascending by
/// `menu_order`. The sort is stable so equal orders keep declaration order.
pub fn menu_pages(pages: &[Page]) -> Vec<Page> {
    let mut menu: Vec<Page> = pages.iter().filter(|p| p.in_menu()).cloned().collect();
    menu.sort_by_key(|p| p.menu_order);
    menu
}
