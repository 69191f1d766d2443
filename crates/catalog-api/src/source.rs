//! The remote collection seen by the state machine
//!
//! The app crate only talks to a [`CollectionSource`]; the HTTP client is one
//! implementation, the in-memory fake from `test_utils` is another.

use catalog_core::prelude::*;
use catalog_core::{Category, Plant};

use crate::query::PageQuery;

/// Read-only access to the category list and the paginated item list.
///
/// Implementations must convert every transport problem into
/// [`Error::Network`] and every non-2xx or malformed response into
/// [`Error::BadResponse`]. An empty list is a successful result.
#[trait_variant::make(CollectionSource: Send)]
pub trait LocalCollectionSource {
    /// Fetch every category, ordered by title
    async fn fetch_categories(&self) -> Result<Vec<Category>>;

    /// Fetch one page of items, ordered by name
    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<Plant>>;
}
