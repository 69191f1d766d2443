//! HTTP client for the remote collection (json-server style REST API)

use std::time::Duration;

use reqwest::Client;
use url::Url;

use catalog_core::prelude::*;
use catalog_core::{Category, Plant};

use crate::protocol::{parse_categories, parse_plants};
use crate::query::{category_params, PageQuery};
use crate::source::CollectionSource;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error bodies longer than this are cut before landing in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Where the collections live
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `http://localhost:3333`
    pub base_url: String,
    /// Path of the item collection relative to `base_url`
    pub items_path: String,
    /// Path of the category collection relative to `base_url`
    pub categories_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// [`CollectionSource`] backed by HTTP GET requests
pub struct HttpCollectionClient {
    client: Client,
    base_url: Url,
    items_path: String,
    categories_path: String,
}

impl HttpCollectionClient {
    /// Create a new client. Fails on an unusable base URL.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("invalid base URL '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }
        // `Url::join` replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            items_path: config.items_path.clone(),
            categories_path: config.categories_path.clone(),
        })
    }

    /// Full URL of one item page
    pub fn items_url(&self, query: PageQuery) -> Result<Url> {
        self.endpoint(&self.items_path, &query.params())
    }

    /// Full URL of the category list
    pub fn categories_url(&self) -> Result<Url> {
        self.endpoint(&self.categories_path, &category_params())
    }

    fn endpoint(&self, path: &str, params: &[(&'static str, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::config(format!("invalid collection path '{path}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            let message = if body.is_empty() {
                format!("{reason} from {url}")
            } else {
                format!("{reason} from {url}: {}", truncate(&body))
            };
            return Err(Error::bad_status(status.as_u16(), message));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        trace!("GET {} -> {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}

impl CollectionSource for HttpCollectionClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let url = self.categories_url()?;
        let body = self.get_body(url).await?;
        parse_categories(&body)
    }

    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<Plant>> {
        let url = self.items_url(query)?;
        let body = self.get_body(url).await?;
        parse_plants(&body)
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_decode() {
        Error::bad_response(e.to_string())
    } else {
        Error::network(e.to_string())
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{cut}…")
    }
}
