//! Dataset (package) parser
//!
//! The dataset is the aggregate root of a CKAN catalog: it embeds its
//! organization, groups, resources and tags, each normalized by its own
//! parser.

use super::coerce::RawRecord;
use super::group::Group;
use super::organization::Organization;
use super::resource::Resource;
use super::tag::Tag;
use super::Metadata;
use ckan_common::{AdditionalData, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &[
    "author",
    "author_email",
    "issued",
    "creator_user_id",
    "groups",
    "id",
    "language",
    "license_id",
    "license_title",
    "license_url",
    "maintainer",
    "maintainer_email",
    "modified",
    "metadata_created",
    "metadata_modified",
    "metadata_language",
    "name",
    "notes",
    "isopen",
    "organization",
    "private",
    "resources",
    "relationships_as_object",
    "relationships_as_subject",
    "state",
    "tags",
    "title",
    "type",
    "url",
    "version",
    "extras",
];

/// Derived fields that the normalized record already answers:
/// `resources.len()`, `tags.len()` and `organization.id`.
const DISCARDED_FIELDS: &[&str] = &["num_resources", "num_tags", "owner_org"];

/// A dataset (CKAN "package")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Machine slug used in URLs
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The dataset's permanent source URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub author: Contact,
    pub maintainer: Contact,
    pub creator: Creator,
    pub license: LicenseRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub metadata: Metadata,
    pub relationships: Relationships,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Usually "dataset", but portals define their own types
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// When the dataset was first issued (upstream `issued`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The license a dataset was released under, as referenced by the dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Dataset relationships, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Vec<Value>>,
}

impl Dataset {
    /// Normalize a raw `package_show`/`package_search` record
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        // fields are read in order; the remainder must come last
        Self {
            id: record.string("id"),
            name: record.string_or_empty("name"),
            title: record.string("title"),
            url: record.string("url"),
            notes: record.string("notes"),
            author: Contact {
                name: record.string("author"),
                email: record.string("author_email"),
            },
            maintainer: Contact {
                name: record.string("maintainer"),
                email: record.string("maintainer_email"),
            },
            creator: Creator {
                id: record.string("creator_user_id"),
            },
            license: LicenseRef {
                id: record.string("license_id"),
                title: record.string("license_title"),
                url: record.string("license_url"),
            },
            organization: record.object("organization").map(Organization::from_raw),
            groups: record.records("groups").iter().map(Group::from_raw).collect(),
            resources: record
                .records("resources")
                .iter()
                .map(Resource::from_raw)
                .collect(),
            tags: record.records("tags").iter().map(Tag::from_raw).collect(),
            languages: record.languages("language"),
            metadata: Metadata::from_record(&record),
            relationships: Relationships {
                subject: record.list("relationships_as_subject"),
                object: record.list("relationships_as_object"),
            },
            open: record.boolean("isopen"),
            private: record.boolean("private"),
            state: record.string("state"),
            kind: record.string("type"),
            version: record.string("version"),
            created: record.date("issued"),
            modified: record.date("modified"),
            additional_data: record.remainder_with_extras(KNOWN_FIELDS, DISCARDED_FIELDS),
        }
    }
}
