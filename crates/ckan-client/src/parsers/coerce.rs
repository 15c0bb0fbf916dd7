//! Primitive coercers shared by every entity parser
//!
//! CKAN payloads are loosely typed: a field may be missing, `null`, a scalar
//! where a list is expected, or a number where a string is documented. The
//! helpers here turn those variations into one predictable shape.

use ckan_common::{AdditionalData, Timestamp};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeSet;

// ============================================================================
// Scalar Coercers
// ============================================================================

/// Parse an upstream date field.
///
/// Missing, `null` and empty values are absent. Numbers are read as epoch
/// milliseconds. Anything unreadable is kept as [`Timestamp::Invalid`].
pub fn parse_date(value: Option<&Value>) -> Option<Timestamp> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(Timestamp::parse(text)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(millis) => Timestamp::from_epoch_millis(millis),
            None => n
                .as_f64()
                .map(|millis| Timestamp::from_epoch_millis(millis as i64))
                .unwrap_or_else(|| Timestamp::Invalid(n.to_string())),
        }),
        other => Some(Timestamp::Invalid(other.to_string())),
    }
}

/// Ensure a language field is always a list.
///
/// A single string becomes a one-element list and a list passes through.
/// Missing, `null` and empty-string values stay absent.
pub fn parse_languages(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(vec![text.clone()]),
        Value::Array(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
        other => scalar_to_string(other).map(|text| vec![text]),
    }
}

/// Flatten a CKAN `extras` list of `{key, value}` pairs into a map.
///
/// The last pair wins when a key repeats. Entries without a string `key` are
/// skipped.
pub fn parse_extras(value: Option<&Value>) -> AdditionalData {
    let mut extras = AdditionalData::new();

    if let Some(Value::Array(pairs)) = value {
        for pair in pairs {
            if let Some(key) = pair.get("key").and_then(Value::as_str) {
                let value = pair.get("value").cloned().unwrap_or(Value::Null);
                extras.insert(key.to_string(), value);
            }
        }
    }

    extras
}

/// Render a JSON scalar as text. Arrays, objects and `null` have no text form.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// Raw Record Access
// ============================================================================

/// Read-only view over one raw upstream record.
///
/// A payload that is not a JSON object reads as an empty record, so parsers
/// stay total. Every typed getter remembers the keys whose non-null value it
/// could not convert; [`RawRecord::remainder`] hands those back verbatim, so a
/// recognized field with an unexpected shape is never lost.
#[derive(Debug, Clone)]
pub(crate) struct RawRecord<'a> {
    fields: Option<&'a Map<String, Value>>,
    unreadable: RefCell<BTreeSet<String>>,
}

impl<'a> RawRecord<'a> {
    pub(crate) fn new(raw: &'a Value) -> Self {
        Self {
            fields: raw.as_object(),
            unreadable: RefCell::new(BTreeSet::new()),
        }
    }

    /// The value under `key`, treating `null` as absent.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields?.get(key).filter(|v| !v.is_null())
    }

    /// Convert the value under `key`, noting it as unreadable on failure.
    pub(crate) fn read<T>(&self, key: &str, convert: impl FnOnce(&'a Value) -> Option<T>) -> Option<T> {
        let value = self.get(key)?;
        let converted = convert(value);
        if converted.is_none() {
            self.unreadable.borrow_mut().insert(key.to_string());
        }
        converted
    }

    /// The first candidate key holding a non-null value.
    ///
    /// Candidates are tried in order; a later name is consulted only when all
    /// earlier ones are missing or `null`.
    fn first_present_key<'k>(&self, candidates: &[&'k str]) -> Option<&'k str> {
        candidates.iter().copied().find(|key| self.get(key).is_some())
    }

    pub(crate) fn string(&self, key: &str) -> Option<String> {
        self.read(key, scalar_to_string)
    }

    /// A string field the upstream always documents; absent becomes `""`.
    pub(crate) fn string_or_empty(&self, key: &str) -> String {
        self.string(key).unwrap_or_default()
    }

    /// String value of the first present candidate key.
    pub(crate) fn first_string(&self, candidates: &[&str]) -> Option<String> {
        self.string(self.first_present_key(candidates)?)
    }

    pub(crate) fn boolean(&self, key: &str) -> Option<bool> {
        self.read(key, |value| match value {
            Value::Bool(b) => Some(*b),
            Value::String(text) => match text.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    pub(crate) fn count(&self, key: &str) -> Option<u64> {
        self.read(key, value_to_count)
    }

    /// Numeric value of the first present candidate key.
    pub(crate) fn first_count(&self, candidates: &[&str]) -> Option<u64> {
        self.count(self.first_present_key(candidates)?)
    }

    pub(crate) fn date(&self, key: &str) -> Option<Timestamp> {
        parse_date(self.get(key))
    }

    pub(crate) fn languages(&self, key: &str) -> Option<Vec<String>> {
        self.read(key, |value| match value {
            Value::String(text) if text.is_empty() => Some(None),
            Value::Array(items) if items.iter().any(|item| scalar_to_string(item).is_none()) => None,
            Value::Object(_) => None,
            other => Some(parse_languages(Some(other))),
        })
        .flatten()
    }

    /// A nested record, if the value is an object.
    pub(crate) fn object(&self, key: &str) -> Option<&'a Value> {
        self.read(key, |value| value.is_object().then_some(value))
    }

    /// Nested records under `key`; absent or non-list values become empty.
    pub(crate) fn records(&self, key: &str) -> &'a [Value] {
        self.read(key, |value| value.as_array().map(Vec::as_slice))
            .unwrap_or_default()
    }

    /// An opaque list, passed through as-is.
    pub(crate) fn list(&self, key: &str) -> Option<Vec<Value>> {
        self.read(key, |value| value.as_array().cloned())
    }

    /// Every field not in `known` or `discarded`, copied verbatim, plus the
    /// known fields a typed getter could not read.
    ///
    /// `null` values are kept: they were sent by the upstream. Call this after
    /// every typed read of the record.
    pub(crate) fn remainder(&self, known: &[&str], discarded: &[&str]) -> AdditionalData {
        let Some(fields) = self.fields else {
            return AdditionalData::new();
        };
        let unreadable = self.unreadable.borrow();

        fields
            .iter()
            .filter(|(key, _)| {
                unreadable.contains(key.as_str())
                    || (!known.contains(&key.as_str()) && !discarded.contains(&key.as_str()))
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// [`RawRecord::remainder`] with the flattened `extras` merged on top;
    /// extras win on key collision.
    pub(crate) fn remainder_with_extras(&self, known: &[&str], discarded: &[&str]) -> AdditionalData {
        let extras = self.read("extras", |value| value.is_array().then(|| parse_extras(Some(value))));
        let mut additional_data = self.remainder(known, discarded);
        additional_data.extend(extras.unwrap_or_default());
        additional_data
    }
}

fn value_to_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_date_absent_and_empty() {
        assert_eq!(parse_date(None), None);
        assert_eq!(parse_date(Some(&Value::Null)), None);
        assert_eq!(parse_date(Some(&json!(""))), None);
    }

    #[test]
    fn test_parse_date_valid_and_invalid() {
        let valid = parse_date(Some(&json!("2021-04-09T11:39:37.657233"))).unwrap();
        assert!(valid.is_valid());

        let invalid = parse_date(Some(&json!("not a date"))).unwrap();
        assert_eq!(invalid, Timestamp::Invalid("not a date".to_string()));
    }

    #[test]
    fn test_parse_date_number_is_epoch_millis() {
        let ts = parse_date(Some(&json!(1_000))).unwrap();
        assert_eq!(ts.valid().unwrap().to_rfc3339(), "1970-01-01T00:00:01+00:00");
    }

    #[test]
    fn test_parse_languages_shapes() {
        assert_eq!(parse_languages(None), None);
        assert_eq!(parse_languages(Some(&json!("en"))), Some(vec!["en".to_string()]));
        assert_eq!(
            parse_languages(Some(&json!(["en", "nl"]))),
            Some(vec!["en".to_string(), "nl".to_string()])
        );
        assert_eq!(parse_languages(Some(&json!([]))), Some(vec![]));
        assert_eq!(parse_languages(Some(&json!(""))), None);
    }

    #[test]
    fn test_parse_extras_last_write_wins() {
        let extras = parse_extras(Some(&json!([
            {"key": "spatial", "value": "POINT(1 2)"},
            {"key": "source", "value": "a"},
            {"key": "source", "value": "b"},
            {"value": "orphan"}
        ])));

        assert_eq!(extras.len(), 2);
        assert_eq!(extras["spatial"], json!("POINT(1 2)"));
        assert_eq!(extras["source"], json!("b"));
    }

    #[test]
    fn test_parse_extras_absent() {
        assert!(parse_extras(None).is_empty());
        assert!(parse_extras(Some(&json!("not a list"))).is_empty());
    }

    #[test]
    fn test_first_present_precedence() {
        let raw = json!({"dataset_count": null, "package_count": 7});
        let record = RawRecord::new(&raw);
        assert_eq!(record.first_count(&["dataset_count", "package_count"]), Some(7));

        let raw = json!({"dataset_count": 3, "package_count": 7});
        let record = RawRecord::new(&raw);
        assert_eq!(record.first_count(&["dataset_count", "package_count"]), Some(3));
    }

    #[test]
    fn test_remainder_partitions_keys() {
        let raw = json!({"id": "1", "name": "n", "custom": null, "drop": 4});
        let rest = RawRecord::new(&raw).remainder(&["id", "name"], &["drop"]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["custom"], Value::Null);
    }

    #[test]
    fn test_non_object_reads_as_empty() {
        let raw = json!("just a string");
        let record = RawRecord::new(&raw);
        assert_eq!(record.string_or_empty("id"), "");
        assert!(record.records("resources").is_empty());
        assert!(record.remainder(&[], &[]).is_empty());
    }

    #[test]
    fn test_unreadable_known_fields_stay_in_remainder() {
        let raw = json!({
            "size": "1.2 MB",
            "position": 3,
            "title": {"en": "Budget"},
            "private": "sometimes",
            "language": "",
            "custom": 1
        });
        let record = RawRecord::new(&raw);

        assert_eq!(record.count("size"), None);
        assert_eq!(record.count("position"), Some(3));
        assert_eq!(record.string("title"), None);
        assert_eq!(record.boolean("private"), None);
        assert_eq!(record.languages("language"), None);

        let rest = record.remainder(&["size", "position", "title", "private", "language"], &[]);
        assert_eq!(rest.len(), 4);
        assert_eq!(rest["size"], json!("1.2 MB"));
        assert_eq!(rest["title"], json!({"en": "Budget"}));
        assert_eq!(rest["private"], json!("sometimes"));
        assert_eq!(rest["custom"], json!(1));
    }

    #[test]
    fn test_remainder_with_extras_keeps_malformed_extras() {
        let raw = json!({"extras": "spatial=POINT(1 2)", "custom": 1});
        let rest = RawRecord::new(&raw).remainder_with_extras(&["extras"], &[]);
        assert_eq!(rest["extras"], json!("spatial=POINT(1 2)"));
        assert_eq!(rest["custom"], json!(1));

        let raw = json!({"extras": [{"key": "custom", "value": 2}], "custom": 1});
        let rest = RawRecord::new(&raw).remainder_with_extras(&["extras"], &[]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["custom"], json!(2));
    }

    #[test]
    fn test_boolean_accepts_string_forms() {
        let raw = json!({"a": true, "b": "False", "c": "maybe"});
        let record = RawRecord::new(&raw);
        assert_eq!(record.boolean("a"), Some(true));
        assert_eq!(record.boolean("b"), Some(false));
        assert_eq!(record.boolean("c"), None);
    }

    proptest! {
        #[test]
        fn prop_languages_never_scalar(lang in "[a-z]{2}", many in proptest::collection::vec("[a-z]{2}", 0..5)) {
            let single = parse_languages(Some(&json!(lang.clone()))).unwrap();
            prop_assert_eq!(single, vec![lang]);

            let list = parse_languages(Some(&json!(many.clone()))).unwrap();
            prop_assert_eq!(list, many);
        }

        #[test]
        fn prop_extras_round_trip(pairs in proptest::collection::btree_map("[a-z_]{1,8}", "[ -~]{0,12}", 0..8)) {
            let raw: Vec<Value> = pairs
                .iter()
                .map(|(k, v)| json!({"key": k, "value": v}))
                .collect();
            let extras = parse_extras(Some(&Value::Array(raw)));

            prop_assert_eq!(extras.len(), pairs.len());
            for (k, v) in &pairs {
                prop_assert_eq!(&extras[k], &json!(v));
            }
        }
    }
}
