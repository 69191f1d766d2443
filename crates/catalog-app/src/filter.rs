//! Category filter over the loaded collection

use catalog_core::{Plant, ALL_CATEGORY_KEY};

/// Items of `items` that belong to `key`, in collection order.
///
/// `"all"` returns the whole collection.
pub fn project(items: &[Plant], key: &str) -> Vec<Plant> {
    if key == ALL_CATEGORY_KEY {
        return items.to_vec();
    }
    items.iter().filter(|p| p.belongs_to(key)).cloned().collect()
}

/// The active category and its projection
#[derive(Debug, Clone)]
pub struct FilterState {
    active: String,
    visible: Vec<Plant>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active: ALL_CATEGORY_KEY.to_string(),
            visible: Vec::new(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch category and recompute. No fetch is involved.
    pub fn apply_category(&mut self, key: &str, items: &[Plant]) {
        self.active = key.to_string();
        self.visible = project(items, key);
    }

    /// Recompute with the current category after the collection changed
    pub fn refresh(&mut self, items: &[Plant]) {
        self.visible = project(items, &self.active);
    }

    pub fn active_category(&self) -> &str {
        &self.active
    }

    pub fn visible_items(&self) -> &[Plant] {
        &self.visible
    }
}
