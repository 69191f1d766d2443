//! Render-ready snapshot of the catalogue

use serde::Serialize;

use catalog_core::{Category, FetchFailure, Plant};

use crate::category_store::CategoriesStatus;

/// Everything the view surface needs to draw the catalogue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub categories: Vec<Category>,
    pub visible_items: Vec<Plant>,
    pub active_category: String,
    pub is_initial_loading: bool,
    pub is_loading_more: bool,
    pub exhausted: bool,
    /// Exhausted with nothing loaded
    pub is_empty: bool,
    /// Items loaded across all pages, before filtering
    pub total_loaded: usize,
    pub categories_status: CategoriesStatus,
    pub categories_error: Option<FetchFailure>,
    pub items_error: Option<FetchFailure>,
}
