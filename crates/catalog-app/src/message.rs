//! Message types for the application (TEA pattern)

use catalog_core::{Category, FetchFailure, Plant};

/// All possible messages/intents in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Open the catalogue: fetch categories and the first page together
    Start,
    /// Stop processing and shut down fetch tasks
    Quit,
    /// Request page 1; follows `Start`
    LoadFirstPage,

    // ─────────────────────────────────────────────────────────
    // User intents
    // ─────────────────────────────────────────────────────────
    /// Re-request the page whose last fetch failed; a no-op otherwise
    RetryPage,
    /// The list was scrolled; distance from the end in viewport units
    ScrollProgress { distance_from_end: f64 },
    /// Show only items of this category ("all" for everything)
    SelectCategory { key: String },
    /// Reload from page 1
    Refresh,

    // ─────────────────────────────────────────────────────────
    // Fetch completions
    // ─────────────────────────────────────────────────────────
    CategoriesLoaded { categories: Vec<Category> },
    CategoriesFailed { error: FetchFailure },
    PageLoaded { page: u32, items: Vec<Plant> },
    PageFailed { page: u32, error: FetchFailure },
}
