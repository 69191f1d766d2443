//! catalog-app - List synchronization state machine for the plant catalogue
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! catalogue: category store, item pagination, category filter, the Engine
//! that runs fetches and broadcasts events, and configuration loading.

pub mod actions;
pub mod category_store;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod filter;
pub mod handler;
pub mod message;
pub mod pagination;
pub mod process;
pub mod signals;
pub mod state;
pub mod view;

// Re-export primary types
pub use category_store::{CategoriesStatus, CategoryStore};
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use filter::{project, FilterState};
pub use handler::{UpdateAction, UpdateResult};
pub use message::Message;
pub use pagination::{PageOutcome, PaginationEngine, SCROLL_TRIGGER_MIN_DISTANCE};
pub use state::{AppPhase, AppState};
pub use view::CatalogView;
