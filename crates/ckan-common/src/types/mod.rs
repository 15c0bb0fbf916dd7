//! Value types shared by every normalized CKAN entity

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upstream fields with no modeled counterpart, keyed by their original name.
pub type AdditionalData = serde_json::Map<String, serde_json::Value>;

/// Naive layouts CKAN is known to emit. They carry no offset and are stored
/// in UTC upstream.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

// ============================================================================
// Timestamp
// ============================================================================

/// A date-time reported by the upstream API.
///
/// CKAN does not guarantee RFC 3339, so a timestamp that cannot be read is
/// kept as [`Timestamp::Invalid`] with its raw text instead of failing the
/// whole entity. Use [`Timestamp::valid`] to treat such values as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// A successfully parsed instant
    Valid(DateTime<Utc>),
    /// Text that could not be parsed as a date-time
    Invalid(String),
}

impl Timestamp {
    /// Parse upstream date text. Never fails; unreadable input becomes
    /// [`Timestamp::Invalid`].
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Self::Valid(dt.with_timezone(&Utc));
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Self::Valid(Utc.from_utc_datetime(&naive));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Self::Valid(Utc.from_utc_datetime(&midnight));
            }
        }

        Self::Invalid(raw.to_string())
    }

    /// Interpret a number as milliseconds since the Unix epoch.
    pub fn from_epoch_millis(millis: i64) -> Self {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(dt) => Self::Valid(dt),
            None => Self::Invalid(millis.to_string()),
        }
    }

    /// The parsed instant, or `None` for an invalid timestamp.
    pub fn valid(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Valid(dt) => Some(dt),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Valid(dt)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Invalid(raw) => write!(f, "Invalid Date ({})", raw),
        }
    }
}

/// Valid timestamps serialize as RFC 3339; invalid ones as `null`, the way an
/// invalid date renders in JSON.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Valid(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Self::Invalid(_) => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            Some(text) => Self::parse(&text),
            None => Self::Invalid(String::new()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;

    #[test]
    fn test_parse_ckan_naive_timestamp() {
        let ts = Timestamp::parse("2021-04-09T11:39:37.657233");
        let dt = ts.valid().unwrap();
        assert_eq!(dt.to_rfc3339(), "2021-04-09T11:39:37.657233+00:00");
        assert_eq!(dt.nanosecond(), 657_233_000);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = Timestamp::parse("2020-01-01T12:00:00+02:00");
        assert_eq!(
            ts.valid().unwrap().to_rfc3339(),
            "2020-01-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_space_separated_and_date_only() {
        assert!(Timestamp::parse("2019-07-15 08:30:00").is_valid());
        assert_eq!(
            Timestamp::parse("2019-07-15").valid().unwrap().to_rfc3339(),
            "2019-07-15T00:00:00+00:00"
        );
    }

    #[test]
    fn test_unparseable_is_invalid_not_error() {
        let ts = Timestamp::parse("last tuesday");
        assert_eq!(ts, Timestamp::Invalid("last tuesday".to_string()));
        assert!(ts.valid().is_none());
    }

    #[test]
    fn test_epoch_millis() {
        let ts = Timestamp::from_epoch_millis(0);
        assert_eq!(ts.valid().unwrap().to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_serialize_valid_and_invalid() {
        let valid = Timestamp::parse("2021-04-09T11:39:37");
        assert_eq!(
            serde_json::to_value(&valid).unwrap(),
            serde_json::json!("2021-04-09T11:39:37+00:00")
        );

        let invalid = Timestamp::parse("garbage");
        assert_eq!(serde_json::to_value(&invalid).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_deserialize_reparses() {
        let ts: Timestamp = serde_json::from_value(serde_json::json!("2021-04-09T11:39:37+00:00")).unwrap();
        assert_eq!(ts, Timestamp::parse("2021-04-09T11:39:37"));
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(text in ".*") {
            let _ = Timestamp::parse(&text);
        }

        #[test]
        fn prop_rfc3339_output_reparses(secs in 0i64..4_102_444_800) {
            let dt = Utc.timestamp_opt(secs, 0).single().unwrap();
            let ts = Timestamp::from(dt);
            prop_assert_eq!(Timestamp::parse(&ts.to_string()), ts);
        }
    }
}
