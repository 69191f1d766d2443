//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON lines.

use catalog_core::FetchFailure;

use crate::view::CatalogView;

/// Domain events emitted by the Engine for external consumers.
///
/// Events are broadcast after each message processing cycle, so subscribers
/// see a consistent view of state changes.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Anything visible changed; carries the full new view
    StateChanged(Box<CatalogView>),

    // ─────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────
    /// The category list arrived (count excludes "all")
    CategoriesLoaded { count: usize },

    CategoriesFailed { error: FetchFailure },

    /// The active category changed
    CategorySelected { key: String, visible: usize },

    // ─────────────────────────────────────────────────────────
    // Pages
    // ─────────────────────────────────────────────────────────
    PageLoaded { page: u32, total_loaded: usize },

    PageFailed { page: u32, error: FetchFailure },

    /// A short page ended the collection
    Exhausted { total_loaded: usize },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StateChanged(_) => "state_changed",
            Self::CategoriesLoaded { .. } => "categories_loaded",
            Self::CategoriesFailed { .. } => "categories_failed",
            Self::CategorySelected { .. } => "category_selected",
            Self::PageLoaded { .. } => "page_loaded",
            Self::PageFailed { .. } => "page_failed",
            Self::Exhausted { .. } => "exhausted",
            Self::Shutdown => "shutdown",
        }
    }
}
