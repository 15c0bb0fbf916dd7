//! Lightweight projections returned by the `*_autocomplete` actions

use super::coerce::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A `package_autocomplete` hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Which field matched the query and how it is displayed
    #[serde(rename = "match")]
    pub matched: AutocompleteMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed: Option<String>,
}

impl AutocompleteDataset {
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            name: record.string("name"),
            title: record.string("title"),
            matched: AutocompleteMatch {
                field: record.string("match_field"),
                displayed: record.string("match_displayed"),
            },
        }
    }
}

/// A `group_autocomplete` or `organization_autocomplete` hit.
///
/// The upstream shape is already consistent, so this is deserialized directly
/// after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteGroup {
    pub id: String,
    pub name: String,
    pub title: String,
}

/// A `user_autocomplete` hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl AutocompleteUser {
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string_or_empty("id"),
            name: record.string_or_empty("name"),
            full_name: record.string("full_name"),
        }
    }
}
