//! Application state (Model in TEA pattern)

use crate::category_store::CategoryStore;
use crate::config::{CatalogSettings, Settings};
use crate::filter::FilterState;
use crate::pagination::PaginationEngine;
use crate::view::CatalogView;

/// Lifecycle of the catalogue session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    /// Constructed, nothing fetched yet
    #[default]
    Idle,
    /// Start was processed; intents are accepted
    Running,
    /// Quit requested; the engine is shutting down
    Quitting,
}

/// Complete application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub phase: AppPhase,
    pub categories: CategoryStore,
    pub pagination: PaginationEngine,
    pub filter: FilterState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(&Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self::with_catalog_settings(&settings.catalog)
    }

    pub fn with_catalog_settings(catalog: &CatalogSettings) -> Self {
        Self {
            phase: AppPhase::Idle,
            categories: CategoryStore::new(catalog.all_category_title.clone()),
            pagination: PaginationEngine::new(catalog.effective_page_size(), catalog.dedupe_by_id),
            filter: FilterState::new(),
        }
    }

    /// Snapshot for the view surface
    pub fn view(&self) -> CatalogView {
        let items = self.pagination.items();
        CatalogView {
            categories: self.categories.categories().to_vec(),
            visible_items: self.filter.visible_items().to_vec(),
            active_category: self.filter.active_category().to_string(),
            is_initial_loading: self.pagination.is_initial_loading(),
            is_loading_more: self.pagination.is_loading_more(),
            exhausted: self.pagination.is_exhausted(),
            is_empty: self.pagination.is_exhausted() && items.is_empty(),
            total_loaded: items.len(),
            categories_status: self.categories.status(),
            categories_error: self.categories.error().cloned(),
            items_error: self.pagination.last_error().cloned(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == AppPhase::Running
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    pub fn has_fetch_in_flight(&self) -> bool {
        self.pagination.in_flight().is_some()
    }
}
