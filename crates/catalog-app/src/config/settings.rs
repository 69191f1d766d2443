//! Settings parser for .plant-catalog/config.toml

use std::path::{Path, PathBuf};

use catalog_core::prelude::*;

use super::types::Settings;

pub const CONFIG_FILENAME: &str = "config.toml";

/// Default config directory, relative to the working directory
pub const CONFIG_DIR: &str = ".plant-catalog";

/// Environment variable that overrides `api.base_url`
pub const API_URL_ENV: &str = "CATALOG_API_URL";

/// Load settings from `<config_dir>/config.toml`.
///
/// A missing or unreadable file is not an error: defaults are returned.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Apply environment overrides on top of file settings
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        let url = url.trim();
        if url.is_empty() {
            debug!("{} is set but empty, ignoring", API_URL_ENV);
        } else {
            debug!("Using base URL from {}: {}", API_URL_ENV, url);
            settings.api.base_url = url.to_string();
        }
    }
}

/// Create `<config_dir>/config.toml` with commented defaults.
///
/// An existing file is left untouched. Returns the config file path.
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# Plant Catalog Configuration

[api]
base_url = "http://localhost:3333"
items_path = "items"                 # Paginated item collection
categories_path = "item_categories"  # Category list
timeout_secs = 10                    # Per-request timeout

[catalog]
page_size = 8                        # Items requested per page
all_category_title = "All"           # Label of the category matching everything
dedupe_by_id = false                 # Drop items already loaded by an earlier page
"#;
        std::fs::write(&config_path, default_content).context("Failed to write config.toml")?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(config_path)
}
