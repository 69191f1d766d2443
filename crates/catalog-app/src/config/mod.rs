//! Configuration file parsing for the plant catalogue
//!
//! Supports:
//! - `.plant-catalog/config.toml` - API location and catalogue behavior
//! - `CATALOG_API_URL` - Base URL override

pub mod settings;
pub mod types;

pub use settings::{
    apply_env_overrides, init_config_dir, load_settings, API_URL_ENV, CONFIG_DIR, CONFIG_FILENAME,
};
pub use types::*;
