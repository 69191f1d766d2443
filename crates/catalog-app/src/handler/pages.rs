//! Pagination handlers

use catalog_core::prelude::*;
use catalog_core::{FetchFailure, Plant};

use crate::state::AppState;

use super::UpdateResult;

pub(crate) fn handle_load_first_page(state: &mut AppState) -> UpdateResult {
    if state.pagination.next_page() != 1 {
        debug!("First page already loaded, ignoring");
        return UpdateResult::none();
    }
    UpdateResult::fetch_page(state.pagination.begin_next_page())
}

/// Pages after the first are only requested by scrolling; retry re-issues
/// the page that failed.
pub(crate) fn handle_retry_page(state: &mut AppState) -> UpdateResult {
    if state.pagination.last_error().is_none() {
        debug!("No failed page to retry");
        return UpdateResult::none();
    }
    info!("Retrying page {}", state.pagination.next_page());
    UpdateResult::fetch_page(state.pagination.begin_next_page())
}

pub(crate) fn handle_scroll(state: &mut AppState, distance_from_end: f64) -> UpdateResult {
    UpdateResult::fetch_page(state.pagination.on_scroll_threshold(distance_from_end))
}

pub(crate) fn handle_refresh(state: &mut AppState) -> UpdateResult {
    if !state.pagination.reset() {
        return UpdateResult::none();
    }
    info!("Refreshing catalogue from page 1");
    UpdateResult::fetch_page(state.pagination.begin_next_page())
}

/// Apply a page and re-project the active category over the grown
/// collection.
pub(crate) fn handle_page_loaded(
    state: &mut AppState,
    page: u32,
    items: Vec<Plant>,
) -> UpdateResult {
    if let Some(outcome) = state.pagination.complete_page(page, items) {
        state.filter.refresh(state.pagination.items());
        if outcome.exhausted {
            info!(
                "Catalogue exhausted after page {} ({} items)",
                page,
                state.pagination.items().len()
            );
        }
    }
    UpdateResult::none()
}

pub(crate) fn handle_page_failed(
    state: &mut AppState,
    page: u32,
    error: FetchFailure,
) -> UpdateResult {
    state.pagination.fail_page(page, error);
    UpdateResult::none()
}
