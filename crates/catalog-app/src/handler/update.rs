//! Main update function - handles state transitions (TEA pattern)

use catalog_core::prelude::*;

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{categories, pages, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Start => handle_start(state),

        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        // Everything below is ignored unless the catalogue is running
        _ if !state.is_running() => {
            debug!("Ignoring {:?} in phase {:?}", message, state.phase);
            UpdateResult::none()
        }

        Message::LoadFirstPage => pages::handle_load_first_page(state),
        Message::RetryPage => pages::handle_retry_page(state),
        Message::ScrollProgress { distance_from_end } => {
            pages::handle_scroll(state, distance_from_end)
        }
        Message::Refresh => pages::handle_refresh(state),
        Message::PageLoaded { page, items } => pages::handle_page_loaded(state, page, items),
        Message::PageFailed { page, error } => pages::handle_page_failed(state, page, error),

        Message::SelectCategory { key } => categories::handle_select_category(state, &key),
        Message::CategoriesLoaded { categories } => {
            categories::handle_categories_loaded(state, categories)
        }
        Message::CategoriesFailed { error } => categories::handle_categories_failed(state, error),
    }
}

/// Open the catalogue: the category fetch is returned as the action and the
/// first page request follows as a message, so both run concurrently.
fn handle_start(state: &mut AppState) -> UpdateResult {
    if state.phase != AppPhase::Idle {
        warn!("Start received in phase {:?}, ignoring", state.phase);
        return UpdateResult::none();
    }

    info!("Starting catalogue");
    state.phase = AppPhase::Running;

    if state.categories.begin_load() {
        UpdateResult::action_then(UpdateAction::FetchCategories, Message::LoadFirstPage)
    } else {
        UpdateResult::message(Message::LoadFirstPage)
    }
}
