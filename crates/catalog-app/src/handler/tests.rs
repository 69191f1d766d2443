//! Tests for handler module

use super::*;
use crate::category_store::CategoriesStatus;
use crate::config::Settings;
use crate::message::Message;
use crate::state::{AppPhase, AppState};
use catalog_api::test_utils::{test_category, test_plant, test_plants};
use catalog_api::PageQuery;
use catalog_core::{FetchErrorKind, FetchFailure};

fn network_error() -> FetchFailure {
    FetchFailure::new(FetchErrorKind::Network, "connection refused")
}

/// Process `msg` and any follow-up messages, collecting the actions
fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    let mut next = Some(msg);
    while let Some(msg) = next {
        let result = update(state, msg);
        actions.extend(result.action);
        next = result.message;
    }
    actions
}

/// Started state with categories loaded and no page fetched yet
fn started_state(page_size: u32) -> (AppState, Vec<UpdateAction>) {
    let mut settings = Settings::default();
    settings.catalog.page_size = page_size;
    let mut state = AppState::with_settings(&settings);
    let actions = run(&mut state, Message::Start);
    (state, actions)
}

fn load_categories(state: &mut AppState) {
    run(
        state,
        Message::CategoriesLoaded {
            categories: vec![
                test_category("indoor", "Indoor"),
                test_category("outdoor", "Outdoor"),
            ],
        },
    );
}

fn scroll_to_end() -> Message {
    Message::ScrollProgress {
        distance_from_end: 2.0,
    }
}

fn page_loaded(page: u32, items: Vec<catalog_core::Plant>) -> Message {
    Message::PageLoaded { page, items }
}

// ─────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_start_fetches_categories_and_first_page() {
    let (state, actions) = started_state(8);

    assert_eq!(state.phase, AppPhase::Running);
    assert_eq!(
        actions,
        vec![
            UpdateAction::FetchCategories,
            UpdateAction::FetchPage(PageQuery::new(1, 8)),
        ]
    );
    assert_eq!(state.categories.status(), CategoriesStatus::Loading);
    assert!(state.view().is_initial_loading);
}

#[test]
fn test_second_start_is_ignored() {
    let (mut state, _) = started_state(8);
    assert!(run(&mut state, Message::Start).is_empty());
}

#[test]
fn test_intents_before_start_are_ignored() {
    let mut state = AppState::new();
    assert!(run(&mut state, Message::RetryPage).is_empty());
    assert!(run(&mut state, Message::ScrollProgress { distance_from_end: 3.0 }).is_empty());
    assert!(state.pagination.in_flight().is_none());
}

#[test]
fn test_quit_message_sets_quitting_phase() {
    let (mut state, _) = started_state(8);

    update(&mut state, Message::Quit);

    assert_eq!(state.phase, AppPhase::Quitting);
    assert!(state.should_quit());
}

#[test]
fn test_completions_after_quit_are_ignored() {
    let (mut state, _) = started_state(8);
    update(&mut state, Message::Quit);

    run(&mut state, page_loaded(1, test_plants(1, 8, &["indoor"])));
    assert!(state.pagination.items().is_empty());
}

// ─────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────

#[test]
fn test_filter_switches_without_fetching() {
    let (mut state, _) = started_state(8);
    load_categories(&mut state);
    run(&mut state, page_loaded(1, test_plants(1, 8, &["indoor"])));

    assert_eq!(state.view().visible_items.len(), 8);

    let actions = run(&mut state, Message::SelectCategory { key: "indoor".into() });
    assert!(actions.is_empty());
    assert_eq!(state.view().visible_items.len(), 8);

    let actions = run(&mut state, Message::SelectCategory { key: "outdoor".into() });
    assert!(actions.is_empty());
    let view = state.view();
    assert!(view.visible_items.is_empty());
    assert_eq!(view.active_category, "outdoor");
    assert_eq!(view.total_loaded, 8);
    // Selecting does not touch pagination
    assert_eq!(state.pagination.next_page(), 2);
}

#[test]
fn test_short_first_page_exhausts_collection() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 3, &["indoor"])));

    let view = state.view();
    assert!(view.exhausted);
    assert!(!view.is_empty);
    assert_eq!(view.visible_items.len(), 3);

    assert!(run(&mut state, Message::RetryPage).is_empty());
    assert!(run(&mut state, Message::ScrollProgress { distance_from_end: 5.0 }).is_empty());
}

#[test]
fn test_category_failure_does_not_block_items() {
    let (mut state, _) = started_state(8);
    run(&mut state, Message::CategoriesFailed { error: network_error() });
    run(&mut state, page_loaded(1, test_plants(1, 8, &["indoor"])));

    let view = state.view();
    assert_eq!(view.categories_status, CategoriesStatus::Failed);
    assert!(view.categories_error.is_some());
    assert!(view.items_error.is_none());
    assert!(!view.is_initial_loading);
    assert_eq!(view.visible_items.len(), 8);
    assert_eq!(view.active_category, "all");
}

#[test]
fn test_only_all_selectable_after_category_failure() {
    let (mut state, _) = started_state(8);
    run(&mut state, Message::CategoriesFailed { error: network_error() });
    run(&mut state, page_loaded(1, test_plants(1, 8, &["indoor"])));

    run(&mut state, Message::SelectCategory { key: "indoor".into() });
    let view = state.view();
    assert_eq!(view.active_category, "all");
    assert_eq!(view.visible_items.len(), 8);
}

#[test]
fn test_scroll_below_threshold_does_not_fetch() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 8, &["indoor"])));

    assert!(run(&mut state, Message::ScrollProgress { distance_from_end: 0.5 }).is_empty());

    let actions = run(&mut state, Message::ScrollProgress { distance_from_end: 2.0 });
    assert_eq!(actions, vec![UpdateAction::FetchPage(PageQuery::new(2, 8))]);
    assert!(state.view().is_loading_more);
}

// ─────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────

#[test]
fn test_pages_append_in_order() {
    let (mut state, _) = started_state(2);
    run(&mut state, page_loaded(1, test_plants(1, 2, &["a"])));
    run(&mut state, scroll_to_end());
    run(&mut state, page_loaded(2, test_plants(3, 2, &["a"])));
    run(&mut state, scroll_to_end());
    run(&mut state, page_loaded(3, test_plants(5, 1, &["a"])));

    let ids: Vec<_> = state.pagination.items().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    assert!(state.view().exhausted);
}

#[test]
fn test_only_one_page_in_flight() {
    let (mut state, actions) = started_state(8);
    assert_eq!(actions.len(), 2);

    assert!(run(&mut state, Message::RetryPage).is_empty());
    assert!(run(&mut state, Message::ScrollProgress { distance_from_end: 9.0 }).is_empty());
    assert!(run(&mut state, Message::Refresh).is_empty());
}

#[test]
fn test_active_filter_follows_new_pages() {
    let (mut state, _) = started_state(2);
    load_categories(&mut state);
    run(&mut state, page_loaded(1, test_plants(1, 2, &["indoor"])));
    run(&mut state, Message::SelectCategory { key: "outdoor".into() });
    assert!(state.view().visible_items.is_empty());

    run(&mut state, scroll_to_end());
    run(
        &mut state,
        page_loaded(
            2,
            vec![
                test_plant("3", "Cacto", &["outdoor"]),
                test_plant("4", "Dracena", &["indoor"]),
            ],
        ),
    );

    let view = state.view();
    assert_eq!(view.active_category, "outdoor");
    assert_eq!(view.visible_items.len(), 1);
    assert_eq!(view.visible_items[0].id, "3");
}

// ─────────────────────────────────────────────────────────
// Errors and edge cases
// ─────────────────────────────────────────────────────────

#[test]
fn test_empty_catalogue() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, Vec::new()));

    let view = state.view();
    assert!(view.is_empty);
    assert!(view.exhausted);
    assert!(!view.is_initial_loading);
}

#[test]
fn test_initial_failure_then_retry() {
    let (mut state, _) = started_state(8);
    run(&mut state, Message::PageFailed { page: 1, error: network_error() });

    let view = state.view();
    assert!(!view.is_initial_loading);
    assert_eq!(view.items_error.map(|e| e.kind), Some(FetchErrorKind::Network));

    let actions = run(&mut state, Message::RetryPage);
    assert_eq!(actions, vec![UpdateAction::FetchPage(PageQuery::new(1, 8))]);
    assert!(state.view().is_initial_loading);

    run(&mut state, page_loaded(1, test_plants(1, 8, &["a"])));
    assert!(state.view().items_error.is_none());
}

#[test]
fn test_retry_without_failure_does_not_fetch() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 8, &["a"])));

    assert!(run(&mut state, Message::RetryPage).is_empty());
    assert_eq!(state.pagination.next_page(), 2);
    assert!(!state.view().is_loading_more);
}

#[test]
fn test_first_page_request_is_not_repeated() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 8, &["a"])));

    assert!(run(&mut state, Message::LoadFirstPage).is_empty());
}

#[test]
fn test_load_more_failure_keeps_items() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 8, &["a"])));
    run(&mut state, scroll_to_end());
    run(&mut state, Message::PageFailed { page: 2, error: network_error() });

    let view = state.view();
    assert_eq!(view.visible_items.len(), 8);
    assert!(!view.is_loading_more);
    assert!(view.items_error.is_some());

    let actions = run(&mut state, Message::RetryPage);
    assert_eq!(actions, vec![UpdateAction::FetchPage(PageQuery::new(2, 8))]);
    assert!(state.view().is_loading_more);
}

#[test]
fn test_stale_page_result_is_ignored() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(3, test_plants(1, 8, &["a"])));

    assert!(state.pagination.items().is_empty());
    assert!(state.view().is_initial_loading);
}

#[test]
fn test_unknown_category_is_rejected() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 8, &["indoor"])));

    // Before categories arrive only "all" is selectable
    run(&mut state, Message::SelectCategory { key: "indoor".into() });
    assert_eq!(state.view().active_category, "all");

    load_categories(&mut state);
    run(&mut state, Message::SelectCategory { key: "garage".into() });
    assert_eq!(state.view().active_category, "all");
    assert_eq!(state.view().visible_items.len(), 8);
}

#[test]
fn test_refresh_reloads_from_first_page() {
    let (mut state, _) = started_state(8);
    run(&mut state, page_loaded(1, test_plants(1, 3, &["a"])));
    assert!(state.view().exhausted);

    let actions = run(&mut state, Message::Refresh);
    assert_eq!(actions, vec![UpdateAction::FetchPage(PageQuery::new(1, 8))]);
    // Previous items stay visible while reloading
    assert_eq!(state.view().visible_items.len(), 3);

    run(&mut state, page_loaded(1, test_plants(20, 2, &["a"])));
    let view = state.view();
    assert_eq!(view.visible_items.len(), 2);
    assert_eq!(view.visible_items[0].id, "20");
}

#[test]
fn test_categories_loaded_view() {
    let (mut state, _) = started_state(8);
    load_categories(&mut state);

    let view = state.view();
    assert_eq!(view.categories_status, CategoriesStatus::Loaded);
    let keys: Vec<_> = view.categories.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["all", "indoor", "outdoor"]);
    // Loading flag belongs to the item stream only
    assert!(view.is_initial_loading);
}
