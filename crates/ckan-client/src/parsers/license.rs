//! License parser

use super::coerce::RawRecord;
use ckan_common::AdditionalData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const KNOWN_FIELDS: &[&str] = &[
    "is_okd_compliant",
    "is_osi_compliant",
    "od_conformance",
    "osd_conformance",
    "domain_content",
    "domain_data",
    "domain_software",
    "family",
    "is_generic",
    "id",
    "status",
    "title",
    "url",
];

/// A license offered by the portal (`license_list`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub compliance: LicenseCompliance,
    pub conformance: LicenseConformance,
    pub domain: LicenseDomain,
    #[serde(default)]
    pub additional_data: AdditionalData,
}

/// Open Knowledge Definition / Open Source Initiative compliance flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseCompliance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub okd: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osi: Option<bool>,
}

/// Open Definition / Open Source Definition conformance levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseConformance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub od: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<bool>,
}

impl License {
    /// Normalize a raw `license_list` entry
    pub fn from_raw(raw: &Value) -> Self {
        let record = RawRecord::new(raw);

        Self {
            id: record.string_or_empty("id"),
            title: record.string_or_empty("title"),
            family: record.string("family"),
            generic: record.boolean("is_generic"),
            status: record.string("status"),
            url: record.string("url"),
            compliance: LicenseCompliance {
                okd: record.boolean("is_okd_compliant"),
                osi: record.boolean("is_osi_compliant"),
            },
            conformance: LicenseConformance {
                od: record.string("od_conformance"),
                osd: record.string("osd_conformance"),
            },
            domain: LicenseDomain {
                content: record.boolean("domain_content"),
                data: record.boolean("domain_data"),
                software: record.boolean("domain_software"),
            },
            additional_data: record.remainder(KNOWN_FIELDS, &[]),
        }
    }
}
