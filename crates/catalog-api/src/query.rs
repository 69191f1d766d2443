//! Read queries understood by the remote collection

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// One page of the item collection, ordered by name ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number
    pub page: u32,
    /// Number of records requested
    pub limit: u32,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Offset of the first record of this page in the full collection
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Query-string parameters for this page
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("_sort", "name".to_string()),
            ("_order", "asc".to_string()),
            ("_page", self.page.to_string()),
            ("_limit", self.limit.to_string()),
        ]
    }
}

/// Query-string parameters of the category list.
///
/// The backend is asked with `order`, not `_order`; the list is sorted by
/// title either way since `_sort` drives the ordering.
pub fn category_params() -> Vec<(&'static str, String)> {
    vec![("_sort", "title".to_string()), ("order", "asc".to_string())]
}
