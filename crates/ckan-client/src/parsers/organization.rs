//! Organization parser

use super::coerce::RawRecord;
use super::user::User;
use super::{DATASET_COUNT_FIELDS, IMAGE_URL_FIELDS};
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

/// Numerical statistics shared by groups and organizations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Dataset count, from `dataset_count` or else `package_count`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
}

impl GroupStats {
    pub(crate) fn from_record(record: &RawRecord<'_>) -> Self {
        Self {
            datasets: record.first_count(DATASET_COUNT_FIELDS),
            followers: record.count("num_followers"),
        }
    }
}

/// A publishing organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
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
    /// Almost always true; the upstream stores organizations as groups
    pub is_organization: bool,
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

impl Organization {
    /// Normalize a raw `organization_show`/`organization_list` record, or the
    /// organization embedded in a dataset
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string("id"),
            name: record.string_or_empty("name"),
            title: record.string_or_empty("title"),
            description: record.string_or_empty("description"),
            display_name: record.string("display_name"),
            image_url: record.first_string(IMAGE_URL_FIELDS),
            is_organization: record.boolean("is_organization").unwrap_or(true),
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

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_organization() -> Value {
        json!({
            "id": "org-1",
            "name": "city-of-example",
            "title": "City of Example",
            "display_name": "City of Example",
            "description": "Open data from the city",
            "image_url": "logo.png",
            "image_display_url": "https://example.org/uploads/logo.png",
            "is_organization": true,
            "approval_status": "approved",
            "created": "2018-06-01T09:12:00.000000",
            "state": "active",
            "type": "organization",
            "package_count": 27,
            "num_followers": 4,
            "revision_id": "r-99",
            "extras": [{"key": "region", "value": "north"}],
            "users": [{"id": "u-1", "display_name": "Admin", "capacity": "admin"}]
        })
    }

    #[test]
    fn test_parse_organization() {
        let org = Organization::from_raw(&raw_organization());

        assert_eq!(org.id.as_deref(), Some("org-1"));
        assert_eq!(org.display_name.as_deref(), Some("City of Example"));
        assert_eq!(
            org.image_url.as_deref(),
            Some("https://example.org/uploads/logo.png")
        );
        assert!(org.is_organization);
        assert_eq!(org.kind.as_deref(), Some("organization"));
        assert_eq!(org.stats.datasets, Some(27));
        assert_eq!(org.stats.followers, Some(4));
        assert_eq!(org.users.len(), 1);
        assert_eq!(org.users[0].rights.role.as_deref(), Some("admin"));

        assert_eq!(org.additional_data.len(), 2);
        assert_eq!(org.additional_data["revision_id"], json!("r-99"));
        assert_eq!(org.additional_data["region"], json!("north"));
    }

    #[test]
    fn test_dataset_count_wins_over_package_count() {
        let org = Organization::from_raw(&json!({
            "id": "o",
            "dataset_count": 5,
            "package_count": 9
        }));
        assert_eq!(org.stats.datasets, Some(5));
    }

    #[test]
    fn test_defaults_for_sparse_record() {
        let org = Organization::from_raw(&json!({"id": "o", "image_url": "a.png"}));
        assert_eq!(org.name, "");
        assert_eq!(org.title, "");
        assert_eq!(org.description, "");
        assert!(org.is_organization);
        assert!(org.users.is_empty());
        assert_eq!(org.image_url.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_unreadable_fields_are_kept() {
        let org = Organization::from_raw(&json!({
            "id": "o",
            "title": {"en": "City", "fr": "Ville"},
            "is_organization": "yes",
            "num_followers": -2,
            "users": "admin"
        }));

        assert_eq!(org.title, "");
        assert!(org.is_organization);
        assert_eq!(org.stats.followers, None);
        assert!(org.users.is_empty());

        assert_eq!(org.additional_data["title"], json!({"en": "City", "fr": "Ville"}));
        assert_eq!(org.additional_data["is_organization"], json!("yes"));
        assert_eq!(org.additional_data["num_followers"], json!(-2));
        assert_eq!(org.additional_data["users"], json!("admin"));
        assert_eq!(org.additional_data.len(), 4);
    }

    #[test]
    fn test_missing_id_is_not_serialized() {
        let org = Organization::from_raw(&json!({"name": "city"}));
        assert_eq!(org.id, None);
        assert!(serde_json::to_value(&org).unwrap().get("id").is_none());
    }

    #[test]
    fn test_type_serializes_under_original_name() {
        let org = Organization::from_raw(&raw_organization());
        let value = serde_json::to_value(&org).unwrap();
        assert_eq!(value["type"], json!("organization"));
        assert_eq!(value["isOrganization"], json!(true));
    }
}
