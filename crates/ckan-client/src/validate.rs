//! Minimal structural checks on API results
//!
//! The upstream gives no guarantee that a list endpoint returns what its
//! documentation promises: a misconfigured portal may return objects from a
//! "names only" endpoint, or bare names from a detailed one. These checks
//! reject such results before callers see them. Every failure is
//! [`CkanError::MalformedResponse`].

use ckan_common::{CkanError, Result};
use serde::Serialize;
use serde_json::Value;

/// Accept a result only if it is a list of strings
pub fn assert_string_array(value: Value) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(CkanError::MalformedResponse);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => Ok(text),
            _ => Err(CkanError::MalformedResponse),
        })
        .collect()
}

/// Accept a result only if it is a list of objects, each carrying every
/// `required` key.
///
/// Only a missing key fails. An explicit `null` or any other falsy value is
/// present.
pub fn assert_object_array(value: &Value, required: &[&str]) -> Result<()> {
    let items = value.as_array().ok_or(CkanError::MalformedResponse)?;

    let all_valid = items.iter().all(|item| {
        item.as_object()
            .is_some_and(|fields| required.iter().all(|key| fields.contains_key(*key)))
    });

    if all_valid {
        Ok(())
    } else {
        Err(CkanError::MalformedResponse)
    }
}

/// Check normalized records against their output schema.
///
/// Records are serialized with their public (camelCase) names, so `required`
/// names output fields such as `displayName`, not upstream keys.
pub fn validate_records<T: Serialize>(records: Vec<T>, required: &[&str]) -> Result<Vec<T>> {
    let serialized = serde_json::to_value(&records).map_err(|_| CkanError::MalformedResponse)?;
    assert_object_array(&serialized, required)?;
    Ok(records)
}

/// Borrow a raw list result, rejecting anything else
pub(crate) fn expect_array(value: &Value) -> Result<&[Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(CkanError::MalformedResponse)
}

/// Reject a single-record result that is not an object
pub(crate) fn expect_object(value: &Value) -> Result<&Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(CkanError::MalformedResponse)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_array_accepts_strings() {
        let names = assert_string_array(json!(["a", "b"])).unwrap();
        assert_eq!(names, vec!["a", "b"]);
        assert!(assert_string_array(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_string_array_rejects_mixed_and_non_lists() {
        for bad in [json!(["a", 1]), json!("a"), json!({"a": 1}), json!(null), json!([{"name": "a"}])] {
            let err = assert_string_array(bad).unwrap_err();
            assert!(err.is_malformed());
        }
    }

    #[test]
    fn test_object_array_acceptance_matrix() {
        let required = ["id", "title"];

        assert!(assert_object_array(&json!([]), &required).is_ok());
        assert!(assert_object_array(&json!([{"id": "1", "title": "One", "x": 0}]), &required).is_ok());
        assert!(assert_object_array(&json!([{"id": 1}]), &[]).is_ok());
    }

    #[test]
    fn test_object_array_only_rejects_missing_keys() {
        let required = ["id", "title"];

        for falsy in [json!(null), json!(""), json!(0), json!(false)] {
            let result = json!([{"id": "1", "title": falsy}]);
            assert!(assert_object_array(&result, &required).is_ok(), "rejected {result}");
        }
    }

    #[test]
    fn test_object_array_rejection_matrix() {
        let required = ["id", "title"];

        let cases = [
            json!("not a list"),
            json!(["name-only"]),
            json!([null]),
            json!([{"id": "1"}]),
            json!([{"id": "1", "title": "One"}, {"title": "Two"}]),
        ];
        for case in cases {
            assert!(
                assert_object_array(&case, &required).unwrap_err().is_malformed(),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn test_validate_records_uses_output_names() {
        #[derive(Debug, Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Record {
            id: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            display_name: Option<String>,
        }

        let good = vec![Record {
            id: "g".to_string(),
            display_name: Some("Group".to_string()),
        }];
        assert_eq!(validate_records(good, &["id", "displayName"]).unwrap().len(), 1);

        let bad = vec![Record {
            id: "g".to_string(),
            display_name: None,
        }];
        assert!(validate_records(bad, &["id", "displayName"]).unwrap_err().is_malformed());
    }

    #[test]
    fn test_validate_records_rejects_skipped_none() {
        #[derive(Debug, Serialize)]
        struct Record {
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<String>,
            title: Option<String>,
        }

        let untitled = vec![Record {
            id: Some("d".to_string()),
            title: None,
        }];
        assert_eq!(validate_records(untitled, &["id", "title"]).unwrap().len(), 1);

        let anonymous = vec![Record {
            id: None,
            title: Some("t".to_string()),
        }];
        assert!(validate_records(anonymous, &["id", "title"]).unwrap_err().is_malformed());
    }

    #[test]
    fn test_expect_array() {
        assert_eq!(expect_array(&json!([1, 2])).unwrap().len(), 2);
        assert!(expect_array(&json!({})).is_err());
    }

    #[test]
    fn test_expect_object() {
        assert!(expect_object(&json!({"id": "x"})).is_ok());
        assert!(expect_object(&json!(null)).unwrap_err().is_malformed());
        assert!(expect_object(&json!(["x"])).unwrap_err().is_malformed());
    }
}
