//! Category list state
//!
//! Holds the filter categories fetched once at startup, with the synthetic
//! "all" category always at index 0 once loading finished.

use serde::Serialize;

use catalog_core::prelude::*;
use catalog_core::{Category, FetchFailure, ALL_CATEGORY_KEY};

/// Lifecycle of the category fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoriesStatus {
    #[default]
    NotRequested,
    Loading,
    /// At least one remote category was received
    Loaded,
    /// The remote list was empty; only "all" is shown
    Empty,
    Failed,
}

#[derive(Debug, Clone)]
pub struct CategoryStore {
    status: CategoriesStatus,
    categories: Vec<Category>,
    error: Option<FetchFailure>,
    all_title: String,
}

impl CategoryStore {
    pub fn new(all_title: impl Into<String>) -> Self {
        Self {
            status: CategoriesStatus::NotRequested,
            categories: Vec::new(),
            error: None,
            all_title: all_title.into(),
        }
    }

    /// Move to `Loading`. Returns false if a fetch was already issued;
    /// categories are fetched exactly once per session.
    pub fn begin_load(&mut self) -> bool {
        if self.status != CategoriesStatus::NotRequested {
            debug!("Categories already requested ({:?}), skipping", self.status);
            return false;
        }
        self.status = CategoriesStatus::Loading;
        true
    }

    /// Store the remote list behind the synthetic "all" category.
    ///
    /// Records that reuse the reserved key are dropped.
    pub fn apply_loaded(&mut self, remote: Vec<Category>) {
        if self.status != CategoriesStatus::Loading {
            warn!("Ignoring category list received while {:?}", self.status);
            return;
        }

        let mut categories = Vec::with_capacity(remote.len() + 1);
        categories.push(Category::all(self.all_title.clone()));
        for category in remote {
            if category.key == ALL_CATEGORY_KEY {
                warn!(
                    "Remote category '{}' uses the reserved key '{}', dropping it",
                    category.title, ALL_CATEGORY_KEY
                );
                continue;
            }
            categories.push(category);
        }

        self.status = if categories.len() > 1 {
            CategoriesStatus::Loaded
        } else {
            CategoriesStatus::Empty
        };
        info!("Loaded {} categories", categories.len() - 1);
        self.categories = categories;
        self.error = None;
    }

    pub fn apply_failed(&mut self, error: FetchFailure) {
        if self.status != CategoriesStatus::Loading {
            warn!("Ignoring category failure received while {:?}", self.status);
            return;
        }
        warn!("Category fetch failed: {}", error);
        self.status = CategoriesStatus::Failed;
        self.categories.clear();
        self.error = Some(error);
    }

    /// Whether `key` can be selected.
    ///
    /// "all" is always selectable; other keys only once the list arrived.
    pub fn is_known(&self, key: &str) -> bool {
        key == ALL_CATEGORY_KEY || self.categories.iter().any(|c| c.key == key)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn status(&self) -> CategoriesStatus {
        self.status
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }
}
