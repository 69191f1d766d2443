//! Category handlers

use catalog_core::prelude::*;
use catalog_core::{Category, FetchFailure};

use crate::state::AppState;

use super::UpdateResult;

pub(crate) fn handle_categories_loaded(
    state: &mut AppState,
    categories: Vec<Category>,
) -> UpdateResult {
    state.categories.apply_loaded(categories);
    UpdateResult::none()
}

/// The store keeps the error for the view; categories are not retried.
pub(crate) fn handle_categories_failed(state: &mut AppState, error: FetchFailure) -> UpdateResult {
    state.categories.apply_failed(error);
    UpdateResult::none()
}

/// Switch the visible subset. Purely local: no fetch is issued and
/// pagination state is not touched.
pub(crate) fn handle_select_category(state: &mut AppState, key: &str) -> UpdateResult {
    if !state.categories.is_known(key) {
        warn!("Unknown category '{}', keeping '{}'", key, state.filter.active_category());
        return UpdateResult::none();
    }

    debug!("Selecting category '{}'", key);
    state.filter.apply_category(key, state.pagination.items());
    UpdateResult::none()
}
