//! Wire format of the remote collection and its validation
//!
//! Response bodies are decoded into loose `Raw*` records first and then
//! validated into the typed [`Plant`] / [`Category`] entities. Any shape
//! mismatch fails the whole response with [`Error::BadResponse`]; nothing
//! half-parsed reaches the state machine.

use serde::Deserialize;

use catalog_core::prelude::*;
use catalog_core::{CareFrequency, Category, Plant, ALL_CATEGORY_KEY};

/// Record ids arrive either as JSON strings or integers depending on the
/// backend (json-server assigns integers).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFrequency {
    times: i64,
    repeat_every: String,
}

/// A plant as sent by the remote collection
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPlant {
    id: RawId,
    name: String,
    about: String,
    water_tips: String,
    photo: String,
    environments: Vec<String>,
    frequency: RawFrequency,
}

impl RawPlant {
    fn validate(self, index: usize) -> Result<Plant> {
        let id = self.id.into_string();
        if id.is_empty() {
            return Err(Error::bad_response(format!("item #{index}: empty id")));
        }
        if self.environments.is_empty() {
            return Err(Error::bad_response(format!(
                "item #{index} ({id}): no environments"
            )));
        }
        let times = u32::try_from(self.frequency.times)
            .ok()
            .filter(|t| *t >= 1)
            .ok_or_else(|| {
                Error::bad_response(format!(
                    "item #{index} ({id}): frequency.times must be >= 1, got {}",
                    self.frequency.times
                ))
            })?;

        Ok(Plant {
            id,
            name: self.name,
            about: self.about,
            water_tips: self.water_tips,
            photo: self.photo,
            environments: self.environments,
            frequency: CareFrequency {
                times,
                repeat_every: self.frequency.repeat_every,
            },
        })
    }
}

/// A category as sent by the remote collection
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCategory {
    key: String,
    title: String,
}

/// Parse and validate a page of items
pub fn parse_plants(body: &[u8]) -> Result<Vec<Plant>> {
    let raw: Vec<RawPlant> = serde_json::from_slice(body)
        .map_err(|e| Error::bad_response(format!("malformed item list: {e}")))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, record)| record.validate(index))
        .collect()
}

/// Parse and validate the category list
///
/// Records using the reserved `"all"` key are dropped: that category is
/// synthesized client-side.
pub fn parse_categories(body: &[u8]) -> Result<Vec<Category>> {
    let raw: Vec<RawCategory> = serde_json::from_slice(body)
        .map_err(|e| Error::bad_response(format!("malformed category list: {e}")))?;

    let mut categories = Vec::with_capacity(raw.len());
    for (index, record) in raw.into_iter().enumerate() {
        if record.key.is_empty() {
            return Err(Error::bad_response(format!("category #{index}: empty key")));
        }
        if record.key == ALL_CATEGORY_KEY {
            warn!("Remote category list contains reserved key '{ALL_CATEGORY_KEY}', dropping it");
            continue;
        }
        categories.push(Category::new(record.key, record.title));
    }
    Ok(categories)
}
