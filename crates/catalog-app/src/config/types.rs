//! Configuration types for the plant catalogue
//!
//! Defines:
//! - `Settings` - Global application settings
//! - `ApiSettings` - Where the remote collections live
//! - `CatalogSettings` - Pagination and filtering behavior

use std::time::Duration;

use serde::{Deserialize, Serialize};

use catalog_api::{ClientConfig, DEFAULT_PAGE_SIZE};
use catalog_core::DEFAULT_ALL_CATEGORY_TITLE;

/// Application settings (.plant-catalog/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Item collection path, relative to `base_url`
    #[serde(default = "default_items_path")]
    pub items_path: String,

    /// Category collection path, relative to `base_url`
    #[serde(default = "default_categories_path")]
    pub categories_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            items_path: default_items_path(),
            categories_path: default_categories_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// Build the HTTP client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            items_path: self.items_path.clone(),
            categories_path: self.categories_path.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_items_path() -> String {
    "items".to_string()
}

fn default_categories_path() -> String {
    "item_categories".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Catalogue behavior settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Localized title of the synthetic "all" category
    #[serde(default = "default_all_category_title")]
    pub all_category_title: String,

    /// Drop records whose id was already loaded by an earlier page
    #[serde(default)]
    pub dedupe_by_id: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            all_category_title: default_all_category_title(),
            dedupe_by_id: false,
        }
    }
}

impl CatalogSettings {
    /// Page size actually used; a zero page size would never advance
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_all_category_title() -> String {
    DEFAULT_ALL_CATEGORY_TITLE.to_string()
}
