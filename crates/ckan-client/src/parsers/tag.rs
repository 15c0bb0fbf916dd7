//! Tag parser

use super::coerce::RawRecord;
use ckan_common::AdditionalData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &["id", "name", "display_name", "state", "vocabulary_id"];

/// A free-form or vocabulary tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Set when the tag belongs to a controlled vocabulary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_id: Option<String>,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

impl Tag {
    /// Normalize a raw `tag_show`/`tag_list` record
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string_or_empty("id"),
            name: record.string_or_empty("name"),
            display_name: record.string_or_empty("display_name"),
            state: record.string("state"),
            vocabulary_id: record.string("vocabulary_id"),
            additional_data: record.remainder(KNOWN_FIELDS, &[]),
        }
    }
}
