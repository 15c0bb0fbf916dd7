//! Action endpoint URL builders
//!
//! Every CKAN action lives at `<site>/api/3/action/<name>`. Callers may hand
//! the client any of the common spellings of a site or API root; the base URL
//! is canonicalized once so the action name can simply be appended.

use ckan_common::{CkanError, Result};
use serde_json::Value;

// ============================================================================
// Endpoint Constants
// ============================================================================

/// Path appended to a site root to reach the action API
pub const ACTION_PATH_SUFFIX: &str = "/api/3/action/";

/// Trailing path segments stripped before [`ACTION_PATH_SUFFIX`] is appended,
/// innermost first
const STRIPPED_SEGMENTS: &[&str] = &["/action", "/3", "/api"];

pub const SITE_READ: &str = "site_read";
pub const PACKAGE_AUTOCOMPLETE: &str = "package_autocomplete";
pub const FORMAT_AUTOCOMPLETE: &str = "format_autocomplete";
pub const GROUP_AUTOCOMPLETE: &str = "group_autocomplete";
pub const ORGANIZATION_AUTOCOMPLETE: &str = "organization_autocomplete";
pub const TAG_AUTOCOMPLETE: &str = "tag_autocomplete";
pub const USER_AUTOCOMPLETE: &str = "user_autocomplete";
pub const PACKAGE_SEARCH: &str = "package_search";
pub const RESOURCE_SEARCH: &str = "resource_search";
pub const PACKAGE_SHOW: &str = "package_show";
pub const PACKAGE_LIST: &str = "package_list";
pub const CURRENT_PACKAGE_LIST_WITH_RESOURCES: &str = "current_package_list_with_resources";
pub const GROUP_SHOW: &str = "group_show";
pub const GROUP_LIST: &str = "group_list";
pub const LICENSE_LIST: &str = "license_list";
pub const ORGANIZATION_SHOW: &str = "organization_show";
pub const ORGANIZATION_LIST: &str = "organization_list";
pub const RESOURCE_SHOW: &str = "resource_show";
pub const TAG_LIST: &str = "tag_list";
pub const USER_SHOW: &str = "user_show";
pub const USER_LIST: &str = "user_list";
pub const VOCABULARY_SHOW: &str = "vocabulary_show";
pub const VOCABULARY_LIST: &str = "vocabulary_list";

// ============================================================================
// Base URL
// ============================================================================

/// Canonicalize a site or API root into the action endpoint prefix.
///
/// Strips any trailing `/api`, `/3`, `/action` (in that order, each optional)
/// and trailing slashes, then appends `/api/3/action/`. With
/// `skip_correction` the URL is only guaranteed to end in one `/`, for
/// portals that mount the action API somewhere non-standard.
///
/// The result is a fixed point: canonicalizing it again changes nothing.
pub fn canonicalize_base_url(url: &str, skip_correction: bool) -> String {
    if skip_correction {
        return if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };
    }

    let mut root = url.trim_end_matches('/');
    for segment in STRIPPED_SEGMENTS {
        if let Some(stripped) = root.strip_suffix(segment) {
            root = stripped;
        }
    }

    format!("{}{}", root, ACTION_PATH_SUFFIX)
}

/// Build the URL of one action
pub fn action_url(base_url: &str, action: &str) -> String {
    format!("{}{}", base_url, action)
}

// ============================================================================
// Query String
// ============================================================================

/// Build an action URL with `params` as its query string.
///
/// Values are not percent-encoded: CKAN query syntax (Solr `+`, `:`, quoted
/// phrases, pre-encoded `%XX` sequences) must reach the server as written.
/// Only `&` and `#` are escaped, since either would split the query.
/// `null` fields are omitted and list fields repeat their key.
pub fn action_url_with_query(base_url: &str, action: &str, params: &Value) -> Result<String> {
    let mut url = action_url(base_url, action);
    let pairs = query_pairs(params)?;

    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    Ok(url)
}

fn query_pairs(params: &Value) -> Result<Vec<String>> {
    let fields = match params {
        Value::Null => return Ok(Vec::new()),
        Value::Object(fields) => fields,
        _ => return Err(non_object_params()),
    };

    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match value {
            Value::Null => {},
            Value::Array(items) => {
                for item in items.iter().filter_map(query_value) {
                    pairs.push(format!("{}={}", key, item));
                }
            },
            other => {
                if let Some(text) = query_value(other) {
                    pairs.push(format!("{}={}", key, text));
                }
            },
        }
    }

    Ok(pairs)
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(escape_query_value(text)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Escape the characters that would end a query value early
pub fn escape_query_value(value: &str) -> String {
    value.replace('&', "%26").replace('#', "%23")
}

pub(crate) fn non_object_params() -> CkanError {
    CkanError::Encode(<serde_json::Error as serde::ser::Error>::custom(
        "action parameters must serialize to a JSON object",
    ))
}
