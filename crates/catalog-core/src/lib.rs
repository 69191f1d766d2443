//! # catalog-core - Core Domain Types
//!
//! Foundation crate for the plant catalogue. Provides domain types, error
//! handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`Category`] - A filter category; [`ALL_CATEGORY_KEY`] is the synthetic one
//! - [`Plant`], [`CareFrequency`] - A catalogue item
//! - [`FetchFailure`], [`FetchErrorKind`] - Cloneable fetch error for the view
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum grouped by layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use catalog_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::{
    CareFrequency, Category, FetchErrorKind, FetchFailure, Plant, ALL_CATEGORY_KEY,
    DEFAULT_ALL_CATEGORY_TITLE,
};
