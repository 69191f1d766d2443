//! Headless mode - NDJSON view surface
//!
//! Outputs the catalogue as structured JSON events on stdout and reads user
//! intents from stdin, one command per line.
//!
//! # Event Format
//!
//! Events are output as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"page_loaded","page":1,"total_loaded":8,"timestamp":1704700001000}
//! {"event":"view","categories":[],"visible_items":[],"active_category":"all","is_initial_loading":false,"timestamp":1704700001000}
//! ```
//!
//! # Commands
//!
//! `select <key>`, `scroll <distance>`, `retry`, `refresh`, `q` / `quit`

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use catalog_app::{CatalogView, EngineEvent};
use catalog_core::{FetchErrorKind, FetchFailure};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Full render-ready state, emitted on every change
    View {
        #[serde(flatten)]
        view: Box<CatalogView>,
        timestamp: i64,
    },

    CategoriesLoaded { count: usize, timestamp: i64 },

    CategoriesFailed {
        kind: FetchErrorKind,
        message: String,
        timestamp: i64,
    },

    CategorySelected {
        key: String,
        visible: usize,
        timestamp: i64,
    },

    PageLoaded {
        page: u32,
        total_loaded: usize,
        timestamp: i64,
    },

    PageFailed {
        page: u32,
        kind: FetchErrorKind,
        message: String,
        timestamp: i64,
    },

    /// No more pages will be requested
    Exhausted { total_loaded: usize, timestamp: i64 },

    /// Error occurred (bad command, fatal startup problem)
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Shutdown { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn error(message: impl Into<String>, fatal: bool) -> Self {
        Self::Error {
            message: message.into(),
            fatal,
            timestamp: Self::now(),
        }
    }

    fn failure_fields(error: &FetchFailure) -> (FetchErrorKind, String) {
        (error.kind, error.message.clone())
    }
}

impl From<&EngineEvent> for HeadlessEvent {
    fn from(event: &EngineEvent) -> Self {
        let timestamp = Self::now();
        match event {
            EngineEvent::StateChanged(view) => Self::View {
                view: view.clone(),
                timestamp,
            },
            EngineEvent::CategoriesLoaded { count } => Self::CategoriesLoaded {
                count: *count,
                timestamp,
            },
            EngineEvent::CategoriesFailed { error } => {
                let (kind, message) = Self::failure_fields(error);
                Self::CategoriesFailed {
                    kind,
                    message,
                    timestamp,
                }
            }
            EngineEvent::CategorySelected { key, visible } => Self::CategorySelected {
                key: key.clone(),
                visible: *visible,
                timestamp,
            },
            EngineEvent::PageLoaded { page, total_loaded } => Self::PageLoaded {
                page: *page,
                total_loaded: *total_loaded,
                timestamp,
            },
            EngineEvent::PageFailed { page, error } => {
                let (kind, message) = Self::failure_fields(error);
                Self::PageFailed {
                    page: *page,
                    kind,
                    message,
                    timestamp,
                }
            }
            EngineEvent::Exhausted { total_loaded } => Self::Exhausted {
                total_loaded: *total_loaded,
                timestamp,
            },
            EngineEvent::Shutdown => Self::Shutdown { timestamp },
        }
    }
}
