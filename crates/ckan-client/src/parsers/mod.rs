//! Response normalization
//!
//! One parser per upstream entity. Each takes a raw, loosely-typed JSON record
//! and returns a fully-typed record with consistent names:
//!
//! - names and labels the upstream always documents are plain `String`s,
//!   empty when the upstream breaks that promise;
//! - dataset, group and organization ids stay `Option`s so that a list
//!   result missing them can be rejected;
//! - everything else the upstream may omit is an `Option`;
//! - nested lists are never absent, only empty;
//! - every field without a modeled counterpart lands in `additional_data`
//!   under its original name, merged with the flattened `extras` list where
//!   the entity has one. A modeled field whose value cannot be read as its
//!   type is kept there too.
//!
//! Parsers are pure and total: they never mutate their input and never fail.

pub mod autocomplete;
pub mod coerce;
pub mod dataset;
pub mod group;
pub mod license;
pub mod organization;
pub mod resource;
pub mod search;
pub mod tag;
pub mod user;
pub mod vocabulary;

use ckan_common::Timestamp;
use coerce::RawRecord;
use serde::{Deserialize, Serialize};

// ============================================================================
// Field Precedence Tables
// ============================================================================
//
// The upstream names the same value differently across actions and versions.
// Candidates are tried in order and the first non-null value wins.

/// Dataset count of a group or organization
pub(crate) const DATASET_COUNT_FIELDS: &[&str] = &["dataset_count", "package_count"];

/// Display image of a group or organization
pub(crate) const IMAGE_URL_FIELDS: &[&str] = &["image_display_url", "image_url"];

/// Catalog bookkeeping ("meta-metadata") carried by datasets and resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Metadata {
    pub(crate) fn from_record(record: &RawRecord<'_>) -> Self {
        Self {
            created: record.date("metadata_created"),
            modified: record.date("metadata_modified"),
            language: record.string("metadata_language"),
        }
    }
}

pub use autocomplete::{AutocompleteDataset, AutocompleteGroup, AutocompleteMatch, AutocompleteUser};
pub use dataset::{Contact, Creator, Dataset, LicenseRef, Relationships};
pub use group::Group;
pub use license::{License, LicenseCompliance, LicenseConformance, LicenseDomain};
pub use organization::{GroupStats, Organization};
pub use resource::{DatasetRef, Resource, ResourceAccess, ResourceCache, ResourceMimeType};
pub use search::SearchResult;
pub use tag::Tag;
pub use user::{User, UserRights, UserStats};
pub use vocabulary::Vocabulary;
