//! Bundle of a menu port with its built-in fallback catalog.

use std::sync::Arc;

use crate::model::MenuItem;
use crate::ports::{MenuPort, SourceMeta};

/// Menu backend plus the catalog served when it fails.
pub struct MenuPlugin {
    /// Static metadata describing the backend.
    pub meta: SourceMeta,
    /// Implementation fetching the menu.
    pub menu_port: Arc<dyn MenuPort>,
    /// Items shown when the fetch fails.
    pub fallback: Vec<MenuItem>,
}

impl MenuPlugin {
    /// Bundle a port with its fallback catalog.
    #[must_use]
    pub fn new(menu_port: Arc<dyn MenuPort>, fallback: Vec<MenuItem>) -> Self {
        Self {
            meta: menu_port.source().clone(),
            menu_port,
            fallback,
        }
    }
}
