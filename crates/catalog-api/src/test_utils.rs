//! Test utilities for the remote collection
//!
//! Provides record builders and [`FakeSource`], a scripted in-memory
//! [`CollectionSource`] that counts requests and can hold a page fetch open
//! until the test releases it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use catalog_core::prelude::*;
use catalog_core::{CareFrequency, Category, Plant};

use crate::query::PageQuery;
use crate::source::CollectionSource;

/// Creates a test plant tagged with the given environments.
///
/// # Arguments
/// * `id` - Record identifier
/// * `name` - Display name (the remote orders by it)
/// * `environments` - Category keys the plant belongs to
pub fn test_plant(id: &str, name: &str, environments: &[&str]) -> Plant {
    Plant {
        id: id.to_string(),
        name: name.to_string(),
        about: format!("About {name}"),
        water_tips: "Water twice a week".to_string(),
        photo: format!("https://example.com/{id}.svg"),
        environments: environments.iter().map(|e| e.to_string()).collect(),
        frequency: CareFrequency {
            times: 2,
            repeat_every: "week".to_string(),
        },
    }
}

/// Creates `count` plants with ids `first_id..first_id + count`, all tagged
/// with the same environments.
pub fn test_plants(first_id: usize, count: usize, environments: &[&str]) -> Vec<Plant> {
    (first_id..first_id + count)
        .map(|n| test_plant(&n.to_string(), &format!("Plant {n:03}"), environments))
        .collect()
}

/// Creates a test category.
pub fn test_category(key: &str, title: &str) -> Category {
    Category::new(key, title)
}

/// A scripted response of the fake source
#[derive(Debug, Clone)]
pub enum FakeResponse<T> {
    Ok(T),
    Network(String),
    BadResponse(String),
}

impl<T: Clone> FakeResponse<T> {
    fn to_result(&self) -> Result<T> {
        match self {
            FakeResponse::Ok(value) => Ok(value.clone()),
            FakeResponse::Network(msg) => Err(Error::network(msg.clone())),
            FakeResponse::BadResponse(msg) => Err(Error::bad_response(msg.clone())),
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    categories: VecDeque<FakeResponse<Vec<Category>>>,
    pages: HashMap<u32, VecDeque<FakeResponse<Vec<Plant>>>>,
    gates: HashMap<u32, Arc<Notify>>,
    category_calls: usize,
    page_requests: Vec<PageQuery>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Handle that releases a held page fetch
#[derive(Debug, Clone)]
pub struct PageGate {
    notify: Arc<Notify>,
}

impl PageGate {
    /// Let the held fetch resolve
    pub fn release(&self) {
        self.notify.notify_one();
    }
}

/// Scripted [`CollectionSource`].
///
/// Each page (and the category list) has a queue of responses. A fetch pops
/// the front of the queue while more than one response is left, so the last
/// response repeats forever. Unscripted pages return an empty list,
/// unscripted categories return an empty list.
#[derive(Debug, Default)]
pub struct FakeSource {
    state: Mutex<FakeState>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the category list
    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.push_categories(FakeResponse::Ok(categories));
        self
    }

    /// Script a page
    pub fn with_page(self, page: u32, plants: Vec<Plant>) -> Self {
        self.push_page(page, FakeResponse::Ok(plants));
        self
    }

    /// Queue one more category response
    pub fn push_categories(&self, response: FakeResponse<Vec<Category>>) {
        self.lock().categories.push_back(response);
    }

    /// Queue one more response for a page
    pub fn push_page(&self, page: u32, response: FakeResponse<Vec<Plant>>) {
        self.lock().pages.entry(page).or_default().push_back(response);
    }

    /// Hold every fetch of `page` until the returned gate is released
    pub fn hold_page(&self, page: u32) -> PageGate {
        let notify = Arc::new(Notify::new());
        self.lock().gates.insert(page, notify.clone());
        PageGate { notify }
    }

    /// Number of category fetches issued so far
    pub fn category_calls(&self) -> usize {
        self.lock().category_calls
    }

    /// Every page request issued so far, in order
    pub fn page_requests(&self) -> Vec<PageQuery> {
        self.lock().page_requests.clone()
    }

    /// Number of page fetches issued so far
    pub fn page_calls(&self) -> usize {
        self.lock().page_requests.len()
    }

    /// Highest number of page fetches that were running at the same time
    pub fn max_concurrent_pages(&self) -> usize {
        self.lock().max_in_flight
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn next_response<T: Clone>(queue: &mut VecDeque<FakeResponse<T>>) -> Option<FakeResponse<T>> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl CollectionSource for FakeSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let response = {
            let mut state = self.lock();
            state.category_calls += 1;
            next_response(&mut state.categories)
        };
        response.map_or_else(|| Ok(Vec::new()), |r| r.to_result())
    }

    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<Plant>> {
        let gate = {
            let mut state = self.lock();
            state.page_requests.push(query);
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state.gates.get(&query.page).cloned()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let response = {
            let mut state = self.lock();
            state.in_flight -= 1;
            state
                .pages
                .get_mut(&query.page)
                .and_then(|queue| next_response(queue))
        };
        response.map_or_else(|| Ok(Vec::new()), |r| r.to_result())
    }
}
