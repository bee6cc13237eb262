//! Lenient deserializers for backend records.
//!
//! The backend is loose about shapes: ids arrive as strings or numbers,
//! lists as arrays, comma-joined strings or `null`.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use super::Priority;

/// Accepts a string, a number or `null` (as the empty string).
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected string or number, got {other}"))),
    }
}

/// Accepts an array of strings, a comma-separated string or `null`.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(de::Error::custom(format!("expected string list item, got {other}"))),
            })
            .collect(),
        other => Err(de::Error::custom(format!("expected list of strings, got {other}"))),
    }
}

/// Keeps any scalar as text; `null` is absent.
///
/// Non-string states survive decoding so the board can report them.
pub(crate) fn raw_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Parses a priority name; anything else, `null` included, is `Low`.
pub(crate) fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().unwrap_or_default(),
        _ => Priority::default(),
    })
}

/// Accepts an array of booleans or `null`.
pub(crate) fn bool_list<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<bool>>::deserialize(deserializer)?.unwrap_or_default())
}
