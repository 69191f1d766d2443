//! Item pagination engine
//!
//! Owns the accumulated item collection and decides when the next page may
//! be requested. Only one page request can be in flight at a time, and no
//! request is issued once a short page marked the collection exhausted.

use std::collections::HashSet;

use catalog_api::PageQuery;
use catalog_core::prelude::*;
use catalog_core::{FetchFailure, Plant};

/// Scroll distances (in viewport units) below this do not trigger a load
pub const SCROLL_TRIGGER_MIN_DISTANCE: f64 = 1.0;

/// Result of applying a successful page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: u32,
    /// Records returned by the remote
    pub received: usize,
    /// Records added to the collection (less than `received` when deduping)
    pub added: usize,
    /// Page 1 replaced the previous collection
    pub replaced: bool,
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct PaginationEngine {
    items: Vec<Plant>,
    /// Next page to request (1-based)
    page: u32,
    page_size: u32,
    initial_loading: bool,
    loading_more: bool,
    exhausted: bool,
    in_flight: Option<PageQuery>,
    last_error: Option<FetchFailure>,
    dedupe_by_id: bool,
}

impl PaginationEngine {
    /// A fresh engine reports `initial_loading` until the first page resolves.
    pub fn new(page_size: u32, dedupe_by_id: bool) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            initial_loading: true,
            loading_more: false,
            exhausted: false,
            in_flight: None,
            last_error: None,
            dedupe_by_id,
        }
    }

    /// Claim the next page. Returns `None` while a request is in flight or
    /// once the collection is exhausted.
    pub fn begin_next_page(&mut self) -> Option<PageQuery> {
        if let Some(query) = self.in_flight {
            debug!("Page {} still in flight, not requesting another", query.page);
            return None;
        }
        if self.exhausted {
            debug!("Collection exhausted at page {}, nothing to request", self.page);
            return None;
        }

        let query = PageQuery::new(self.page, self.page_size);
        if query.page == 1 {
            self.initial_loading = true;
        } else {
            self.loading_more = true;
        }
        self.in_flight = Some(query);
        debug!("Requesting page {} (offset {})", query.page, query.offset());
        Some(query)
    }

    /// Apply the records of the in-flight page.
    ///
    /// Returns `None` (and changes nothing) when `page` is not the page in
    /// flight.
    pub fn complete_page(&mut self, page: u32, records: Vec<Plant>) -> Option<PageOutcome> {
        if !self.is_in_flight(page) {
            warn!("Discarding stale result for page {}", page);
            return None;
        }

        let received = records.len();
        let exhausted = received < self.page_size as usize;
        let replaced = page == 1;

        if replaced {
            self.items.clear();
        }
        let added = self.append(records);

        self.page = page + 1;
        self.exhausted = exhausted;
        self.in_flight = None;
        self.initial_loading = false;
        self.loading_more = false;
        self.last_error = None;

        debug!(
            "Page {} applied: {} received, {} added, {} total{}",
            page,
            received,
            added,
            self.items.len(),
            if exhausted { ", exhausted" } else { "" }
        );

        Some(PageOutcome {
            page,
            received,
            added,
            replaced,
            exhausted,
        })
    }

    /// Record a failed page. Items and the page counter are kept, so the
    /// same page is requested again on the next trigger.
    ///
    /// Returns false when `page` is not the page in flight.
    pub fn fail_page(&mut self, page: u32, error: FetchFailure) -> bool {
        if !self.is_in_flight(page) {
            warn!("Discarding stale failure for page {}", page);
            return false;
        }

        error!("Page {} failed: {}", page, error);
        self.in_flight = None;
        self.initial_loading = false;
        self.loading_more = false;
        self.last_error = Some(error);
        true
    }

    /// Scroll near the end of the list.
    ///
    /// `distance_from_end` is measured in viewport units.
    pub fn on_scroll_threshold(&mut self, distance_from_end: f64) -> Option<PageQuery> {
        if !distance_from_end.is_finite() {
            debug!("Ignoring non-finite scroll distance");
            return None;
        }
        if distance_from_end < SCROLL_TRIGGER_MIN_DISTANCE {
            trace!("Scroll distance {} below trigger", distance_from_end);
            return None;
        }
        self.begin_next_page()
    }

    /// Rewind to page 1 so the collection can be reloaded.
    ///
    /// Loaded items stay visible until page 1 replaces them. Refused while
    /// a request is in flight.
    pub fn reset(&mut self) -> bool {
        if let Some(query) = self.in_flight {
            warn!("Refresh refused: page {} in flight", query.page);
            return false;
        }
        self.page = 1;
        self.exhausted = false;
        self.last_error = None;
        true
    }

    fn is_in_flight(&self, page: u32) -> bool {
        self.in_flight.is_some_and(|q| q.page == page)
    }

    fn append(&mut self, records: Vec<Plant>) -> usize {
        if !self.dedupe_by_id {
            let added = records.len();
            self.items.extend(records);
            return added;
        }

        let mut seen: HashSet<String> = self.items.iter().map(|p| p.id.clone()).collect();
        let before = self.items.len();
        for plant in records {
            if seen.insert(plant.id.clone()) {
                self.items.push(plant);
            } else {
                debug!("Dropping duplicate item {}", plant.id);
            }
        }
        self.items.len() - before
    }

    pub fn items(&self) -> &[Plant] {
        &self.items
    }

    /// Next page that will be requested
    pub fn next_page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_initial_loading(&self) -> bool {
        self.initial_loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn in_flight(&self) -> Option<PageQuery> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }
}
