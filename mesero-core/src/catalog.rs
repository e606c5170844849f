//! Loaded menu, its categories, and the filters applied while browsing.

use chrono::Weekday;
use tracing::debug;

use crate::model::{MenuItem, Service};

/// Lowercase `text` and strip Spanish diacritics so `Ñandú` compares like `nandu`.
pub(crate) fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Sort key for Spanish display order: accents are ignored, `ñ` sorts after every `n`.
pub(crate) fn collation_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch == 'ñ' {
            key.push('n');
            key.push(char::MAX);
        } else {
            key.push_str(&fold(ch.encode_utf8(&mut [0; 4])));
        }
    }
    key
}

/// Drop items that cannot be shown or priced: blank names or zero price.
#[must_use]
pub fn sanitize(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let before = items.len();
    let kept: Vec<MenuItem> = items
        .into_iter()
        .filter(|item| !item.name.trim().is_empty() && item.price.amount() > 0)
        .collect();
    if kept.len() < before {
        debug!(dropped = before - kept.len(), "dropped malformed menu items");
    }
    kept
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where a menu came from.
pub enum MenuSource {
    /// Fetched from the menu port.
    Remote,
    /// Built-in catalog used after a failed fetch.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
/// Menu for one browsing session, sorted for display.
pub struct Menu {
    items: Vec<MenuItem>,
    categories: Vec<String>,
    source: MenuSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Browsing filter.
pub struct MenuFilter {
    /// Service being browsed.
    pub service: Service,
    /// Day the order is for.
    pub weekday: Weekday,
    /// Selected category, `None` for all.
    pub category: Option<String>,
}

impl Menu {
    /// Sanitize and sort items by name, and collect their categories.
    #[must_use]
    pub fn new(items: Vec<MenuItem>, source: MenuSource) -> Self {
        let mut items = sanitize(items);
        items.sort_by_cached_key(|item| collation_key(&item.name));

        let mut categories: Vec<String> = items
            .iter()
            .flat_map(|item| item.categories.iter().cloned())
            .collect();
        categories.sort_by_cached_key(|category| collation_key(category));
        categories.dedup();

        Self {
            items,
            categories,
            source,
        }
    }

    /// All items in display order.
    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Unique categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Origin of the items.
    #[must_use]
    pub fn source(&self) -> MenuSource {
        self.source
    }

    /// Items offered for the filter's service and weekday, narrowed to its category.
    ///
    /// Unavailable items are kept so they can be shown as sold out.
    #[must_use]
    pub fn visible(&self, filter: &MenuFilter) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| item.served_in(filter.service) && item.served_on(filter.weekday))
            .filter(|item| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|category| item.has_category(category))
            })
            .collect()
    }
}
