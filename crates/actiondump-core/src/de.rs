//! Deserializers tolerant of how the Zabbix API encodes scalars.
//!
//! The API sends numeric codes and identifiers as JSON strings, older
//! versions occasionally as numbers, and leaves optional members out or
//! sets them to `null`. Non-message operations may even carry an empty
//! array where an `opmessage` object would be. Everything here maps those
//! variants onto "empty" instead of failing.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Converts a scalar JSON value into its string form.
///
/// Arrays, objects and `null` have no scalar form and yield `None`.
pub fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads a string, number or bool as an optional string.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

/// Like [`opt_string`], with missing values collapsed to `""`.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Treats `null` as the type's default (usually an empty list).
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes `T` only when the value is a JSON object.
///
/// Anything else (`null`, `[]`, a stray scalar) is read as "absent".
pub fn object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Parses a numeric code, using `missing` when the code is absent or not a number.
pub fn parse_code(raw: Option<&str>, missing: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        code: Option<String>,
        #[serde(default, deserialize_with = "null_default")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "object_or_none")]
        nested: Option<Nested>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Nested {
        subject: String,
    }

    #[test]
    fn numbers_and_strings_read_alike() {
        let a: Probe = serde_json::from_value(json!({"code": "13"})).unwrap();
        let b: Probe = serde_json::from_value(json!({"code": 13})).unwrap();
        assert_eq!(a.code.as_deref(), Some("13"));
        assert_eq!(a.code, b.code);
    }

    #[test]
    fn null_and_missing_are_empty() {
        let p: Probe = serde_json::from_value(json!({"code": null, "items": null})).unwrap();
        assert!(p.code.is_none());
        assert!(p.items.is_empty());
        assert!(p.nested.is_none());
    }

    #[test]
    fn empty_array_in_place_of_object_is_absent() {
        let p: Probe = serde_json::from_value(json!({"nested": []})).unwrap();
        assert!(p.nested.is_none());

        let p: Probe = serde_json::from_value(json!({"nested": {"subject": "S"}})).unwrap();
        assert_eq!(p.nested, Some(Nested { subject: "S".into() }));
    }

    #[test]
    fn parse_code_falls_back() {
        assert_eq!(parse_code(Some("4"), -1), 4);
        assert_eq!(parse_code(Some(" 16 "), -1), 16);
        assert_eq!(parse_code(Some("abc"), -1), -1);
        assert_eq!(parse_code(None, 0), 0);
    }
}
