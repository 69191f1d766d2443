//! # catalog-api - Remote Collection Client
//!
//! Read-only access to the remote category list and the paginated item list.
//!
//! Depends on [`catalog_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Source Abstraction
//! - [`CollectionSource`] - What the state machine fetches from (Send futures)
//! - [`LocalCollectionSource`] - Same trait without the `Send` bound
//!
//! ### HTTP Client
//! - [`HttpCollectionClient`] - json-server style REST client
//! - [`ClientConfig`] - Base URL, collection paths, timeout
//!
//! ### Queries and Wire Format
//! - [`PageQuery`] - One page request (`_page`/`_limit`, ordered by name)
//! - [`parse_plants()`], [`parse_categories()`] - Validate response bodies

pub mod client;
pub mod protocol;
pub mod query;
pub mod source;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use client::{ClientConfig, HttpCollectionClient, DEFAULT_REQUEST_TIMEOUT};
pub use protocol::{parse_categories, parse_plants};
pub use query::{category_params, PageQuery, DEFAULT_PAGE_SIZE};
pub use source::{CollectionSource, LocalCollectionSource};
