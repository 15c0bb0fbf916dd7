//! Resource parser

use super::coerce::RawRecord;
use super::Metadata;
use ckan_common::{AdditionalData, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &[
    "datastore_active",
    "url_type",
    "cache_url",
    "cache_last_updated",
    "created",
    "description",
    "format",
    "hash",
    "id",
    "language",
    "metadata_created",
    "metadata_modified",
    "metadata_language",
    "mimetype",
    "mimetype_inner",
    "last_modified",
    "name",
    "package_id",
    "position",
    "size",
    "state",
    "url",
];

/// A file or API endpoint published as part of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Size in bytes; frequently `null` upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    /// From upstream `last_modified`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub metadata: Metadata,
    pub access: ResourceAccess,
    pub cache: ResourceCache,
    pub mime_type: ResourceMimeType,
    pub dataset: DatasetRef,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAccess {
    /// Whether the resource is loaded into the DataStore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// `upload` for hosted files, absent for links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceCache {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMimeType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// MIME type of the content inside an archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<String>,
}

/// Back-reference to the owning dataset: its id and this resource's position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

impl Resource {
    /// Normalize a raw `resource_show`/`resource_search` record, or a
    /// resource embedded in a dataset
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string_or_empty("id"),
            name: record.string_or_empty("name"),
            url: record.string_or_empty("url"),
            description: record.string("description"),
            format: record.string("format"),
            hash: record.string("hash"),
            size: record.count("size"),
            state: record.string("state"),
            created: record.date("created"),
            modified: record.date("last_modified"),
            languages: record.languages("language"),
            metadata: Metadata::from_record(&record),
            access: ResourceAccess {
                active: record.boolean("datastore_active"),
                url_type: record.string("url_type"),
            },
            cache: ResourceCache {
                url: record.string("cache_url"),
                updated: record.date("cache_last_updated"),
            },
            mime_type: ResourceMimeType {
                resource: record.string("mimetype"),
                inner: record.string("mimetype_inner"),
            },
            dataset: DatasetRef {
                id: record.string("package_id"),
                position: record.count("position"),
            },
            additional_data: record.remainder(KNOWN_FIELDS, &[]),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_resource() {
        let resource = Resource::from_raw(&json!({
            "id": "res-1",
            "package_id": "pkg-1",
            "position": 2,
            "name": "Budget 2021",
            "url": "https://example.org/budget.csv",
            "format": "CSV",
            "hash": "",
            "size": 20480,
            "mimetype": "text/csv",
            "mimetype_inner": null,
            "datastore_active": true,
            "url_type": "upload",
            "cache_url": null,
            "cache_last_updated": "2021-05-01T00:00:00",
            "created": "2021-04-09T11:39:37.657233",
            "last_modified": "2021-04-10T08:00:00",
            "metadata_modified": "2021-04-10T08:00:01",
            "language": "en",
            "resource_type": "file.upload"
        }));

        assert_eq!(resource.id, "res-1");
        assert_eq!(resource.dataset.id.as_deref(), Some("pkg-1"));
        assert_eq!(resource.dataset.position, Some(2));
        assert_eq!(resource.size, Some(20480));
        assert_eq!(resource.access.active, Some(true));
        assert_eq!(resource.access.url_type.as_deref(), Some("upload"));
        assert_eq!(resource.mime_type.resource.as_deref(), Some("text/csv"));
        assert_eq!(resource.mime_type.inner, None);
        assert!(resource.cache.updated.unwrap().is_valid());
        assert!(resource.modified.unwrap().is_valid());
        assert!(resource.metadata.modified.is_some());
        assert_eq!(resource.metadata.created, None);
        assert_eq!(resource.languages, Some(vec!["en".to_string()]));

        assert_eq!(resource.additional_data.len(), 1);
        assert_eq!(resource.additional_data["resource_type"], json!("file.upload"));
    }

    #[test]
    fn test_null_size_and_missing_labels() {
        let resource = Resource::from_raw(&json!({"id": "r", "size": null}));
        assert_eq!(resource.size, None);
        assert_eq!(resource.name, "");
        assert_eq!(resource.url, "");
    }

    #[test]
    fn test_string_size_is_read() {
        let resource = Resource::from_raw(&json!({"id": "r", "size": "1024"}));
        assert_eq!(resource.size, Some(1024));
    }

    #[test]
    fn test_human_readable_size_is_kept_raw() {
        let resource = Resource::from_raw(&json!({
            "id": "r",
            "size": "1.2 MB",
            "position": "first",
            "format": ["CSV", "ZIP"],
            "datastore_active": "pending"
        }));

        assert_eq!(resource.size, None);
        assert_eq!(resource.dataset.position, None);
        assert_eq!(resource.format, None);
        assert_eq!(resource.access.active, None);

        assert_eq!(resource.additional_data["size"], json!("1.2 MB"));
        assert_eq!(resource.additional_data["position"], json!("first"));
        assert_eq!(resource.additional_data["format"], json!(["CSV", "ZIP"]));
        assert_eq!(resource.additional_data["datastore_active"], json!("pending"));
        assert_eq!(resource.additional_data.len(), 4);
    }
}
