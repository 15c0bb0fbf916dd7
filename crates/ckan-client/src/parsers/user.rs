//! User parser

use super::coerce::RawRecord;
use ckan_common::{AdditionalData, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &[
    "display_name",
    "id",
    "capacity",
    "sysadmin",
    "number_of_edits",
    "number_created_packages",
    "created",
    "fullname",
    "openid",
    "state",
];

/// A site user, or a member listed on a group or organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    pub rights: UserRights,
    pub stats: UserStats,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRights {
    /// Membership capacity (`admin`, `editor`, `member`) when listed on a group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysadmin: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<u64>,
}

impl User {
    /// Normalize a raw `user_show`/`user_list` record
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string_or_empty("id"),
            display_name: record.string_or_empty("display_name"),
            full_name: record.string("fullname"),
            state: record.string("state"),
            openid: record.string("openid"),
            created: record.date("created"),
            rights: UserRights {
                role: record.string("capacity"),
                sysadmin: record.boolean("sysadmin"),
            },
            stats: UserStats {
                edits: record.count("number_of_edits"),
                datasets: record.count("number_created_packages"),
            },
            additional_data: record.remainder(KNOWN_FIELDS, &[]),
        }
    }
}
