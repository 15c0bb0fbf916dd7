//! Tag vocabulary parser

use super::coerce::RawRecord;
use super::tag::Tag;
use ckan_common::AdditionalData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &["id", "name", "tags"];

/// A controlled tag vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

impl Vocabulary {
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string_or_empty("id"),
            name: record.string_or_empty("name"),
            tags: record.records("tags").iter().map(Tag::from_raw).collect(),
            additional_data: record.remainder(KNOWN_FIELDS, &[]),
        }
    }
}
