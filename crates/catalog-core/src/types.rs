//! Core domain types for the plant catalogue

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Key of the synthetic category that matches every item.
///
/// Reserved: it is prepended client-side and never comes from the remote
/// source.
pub const ALL_CATEGORY_KEY: &str = "all";

/// Default display title of the synthetic "all" category
pub const DEFAULT_ALL_CATEGORY_TITLE: &str = "All";

/// A filter category (environment) an item can belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier, matched against [`Plant::environments`]
    pub key: String,
    /// Display label
    pub title: String,
}

impl Category {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }

    /// The synthetic "all" category with a localized title
    pub fn all(title: impl Into<String>) -> Self {
        Self::new(ALL_CATEGORY_KEY, title)
    }

    pub fn is_all(&self) -> bool {
        self.key == ALL_CATEGORY_KEY
    }
}

/// How often a plant needs watering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareFrequency {
    /// Number of waterings per period, always >= 1
    pub times: u32,
    /// Period label, e.g. "day" or "week"
    pub repeat_every: String,
}

/// A catalogue item
///
/// Descriptive fields are opaque to the list-sync core; only `id` and
/// `environments` drive behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub about: String,
    pub water_tips: String,
    pub photo: String,
    /// Category keys this plant belongs to (non-empty)
    pub environments: Vec<String>,
    pub frequency: CareFrequency,
}

impl Plant {
    /// Whether this plant is tagged with the given category key
    pub fn belongs_to(&self, key: &str) -> bool {
        self.environments.iter().any(|env| env == key)
    }
}

/// Classification of a failed fetch, as surfaced to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Transport/DNS/timeout
    Network,
    /// Non-2xx status or unparseable body
    BadResponse,
    /// Anything else that stopped the fetch (should not happen in practice)
    Other,
}

/// A cloneable description of a failed fetch.
///
/// [`Error`] is not `Clone` (it wraps `std::io::Error`), so fetch tasks
/// convert it into this before handing it to the message loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        let kind = match err {
            Error::Network { .. } => FetchErrorKind::Network,
            Error::BadResponse { .. } | Error::Json(_) => FetchErrorKind::BadResponse,
            _ => FetchErrorKind::Other,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<Error> for FetchFailure {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
