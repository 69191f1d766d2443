//! Plant Catalog Library
//!
//! Paginated, filterable plant catalogue client. The list synchronization
//! state machine lives in `catalog_app`; this crate wires it to the HTTP
//! client and to the headless NDJSON view surface.

pub mod headless;

// Re-export main entry point
pub use headless::runner::run_headless;
