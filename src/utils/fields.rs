//! Lenient payload field handling.
//!
//! Mobile clients send ids as numbers or strings, use `false`/`null`/`""` for
//! "not set", and emit timestamps in a few shapes. These helpers normalise all
//! of that at the serde boundary.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer, de};
use serde_json::Value;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses a client timestamp. RFC 3339 values carrying an offset are converted
/// to server-local time; naive values are taken as server-local already.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    let mut last_err = None;
    for format in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(raw, format) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => last_err = Some(e),
        }
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Ok(parsed.with_timezone(&Local).naive_local()),
        Err(e) => Err(last_err.unwrap_or(e)),
    }
}

/// `null`, `false`, `""` and a missing key all mean "not supplied".
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_timestamp(&s)
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        Some(other) => Err(de::Error::custom(format!(
            "expected timestamp string, got {other}"
        ))),
    }
}

/// Record id given as a number or numeric string.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid id {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid id {s:?}: {e}"))),
        Some(other) => Err(de::Error::custom(format!("expected id, got {other}"))),
    }
}

/// Keeps an explicit `null` distinguishable from a missing key; pair with
/// `#[serde(default)]`.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

pub fn serialize_timestamp<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(at) => serializer.collect_str(&at.format(TIMESTAMP_FORMAT)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_id")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "lenient_timestamp")]
        at: Option<NaiveDateTime>,
    }

    fn expected_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap()
    }

    #[rstest]
    #[case("2026-03-02 08:15:00")]
    #[case("2026-03-02T08:15:00")]
    #[case("2026-03-02T08:15:00.000")]
    fn parses_naive_timestamp_shapes(#[case] raw: &str) {
        assert_eq!(parse_timestamp(raw).unwrap(), expected_at());
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_timestamp("yesterday at eight").is_err());
    }

    #[rstest]
    #[case(json!({}), None)]
    #[case(json!({"id": null}), None)]
    #[case(json!({"id": false}), None)]
    #[case(json!({"id": ""}), None)]
    #[case(json!({"id": 42}), Some(42))]
    #[case(json!({"id": "42"}), Some(42))]
    fn ids_are_lenient(#[case] body: Value, #[case] expected: Option<u64>) {
        let sample: Sample = serde_json::from_value(body).unwrap();
        assert_eq!(sample.id, expected);
    }

    #[rstest]
    #[case(json!({"id": -3}))]
    #[case(json!({"id": "abc"}))]
    #[case(json!({"id": [1]}))]
    #[case(json!({"at": 1700000000}))]
    #[case(json!({"at": "not a date"}))]
    fn malformed_fields_fail(#[case] body: Value) {
        assert!(serde_json::from_value::<Sample>(body).is_err());
    }

    #[test]
    fn empty_timestamp_means_absent() {
        let sample: Sample = serde_json::from_value(json!({"at": ""})).unwrap();
        assert_eq!(sample.at, None);
    }
}
