//! Handler module - TEA update function and intent handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `categories`: Category fetch results and category selection
//! - `pages`: Page requests, page results, scroll and refresh intents

pub(crate) mod categories;
pub(crate) mod pages;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use catalog_api::PageQuery;

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Fetch the category list (issued once per session)
    FetchCategories,

    /// Fetch one page of items. The page is already marked in flight.
    FetchPage(PageQuery),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn action_then(action: UpdateAction, msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }

    /// Wrap an optional page request
    pub(crate) fn fetch_page(query: Option<PageQuery>) -> Self {
        match query {
            Some(query) => Self::action(UpdateAction::FetchPage(query)),
            None => Self::none(),
        }
    }
}
