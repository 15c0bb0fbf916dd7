//! Group parser

use super::coerce::RawRecord;
use super::organization::GroupStats;
use super::user::User;
use super::IMAGE_URL_FIELDS;
use ckan_common::{AdditionalData, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &[
    "approval_status",
    "created",
    "dataset_count",
    "description",
    "display_name",
    "extras",
    "groups",
    "id",
    "image_display_url",
    "image_url",
    "is_organization",
    "name",
    "num_followers",
    "package_count",
    "state",
    "title",
    "type",
    "users",
];

/// A thematic group of datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short machine name
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the upstream flags this group as an organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<bool>,
    /// Names of the parent groups. Kept as references so nesting stays flat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
    pub stats: GroupStats,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

impl Group {
    /// Normalize a raw `group_show`/`group_list` record, or a group embedded
    /// in a dataset
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string("id"),
            name: record.string_or_empty("name"),
            title: record.string_or_empty("title"),
            description: record.string_or_empty("description"),
            display_name: record.string("display_name"),
            image_url: record.first_string(IMAGE_URL_FIELDS),
            organization: record.boolean("is_organization"),
            groups: parent_group_names(&record),
            approval_status: record.string("approval_status"),
            created: record.date("created"),
            state: record.string("state"),
            kind: record.string("type"),
            stats: GroupStats::from_record(&record),
            users: record.records("users").iter().map(User::from_raw).collect(),
            additional_data: record.remainder_with_extras(KNOWN_FIELDS, &[]),
        }
    }
}

/// `group_show` with `include_groups` lists parents either as names or as
/// full group dicts; both reduce to names.
/// Any other shape leaves the raw list in `additional_data`.
fn parent_group_names(record: &RawRecord<'_>) -> Option<Vec<String>> {
    record.read("groups", |value| {
        value
            .as_array()?
            .iter()
            .map(|parent| match parent {
                Value::String(name) => Some(name.clone()),
                Value::Object(fields) => fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    })
}
