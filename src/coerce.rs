//! Conversions between nullable SDK representations and [`Value`]s.
//!
//! Generated adapters shuttle between three representations: optional
//! language-native values (`Option<i64>`, `Option<String>`), the [`Value`]
//! tree the core reconciles, and the `serde_json::Value`s the vendor SDK
//! unmarshals responses into. The helpers here are total on those
//! representations and keep "absent" strictly separate from zero values:
//! `None` becomes [`Value::Null`], never `0` or `""`.

use crate::error::CoreError;
use crate::value::{Collection, Record, Value};
use serde::de::Error as _;
use std::collections::{BTreeMap, BTreeSet};

/// Convert an optional native value, mapping `None` to [`Value::Null`].
///
/// ```
/// use dashboard_provider_core::{coerce, Value};
///
/// assert_eq!(coerce::from_opt(Some(0i64)), Value::Int(0));
/// assert_eq!(coerce::from_opt(None::<i64>), Value::Null);
/// ```
pub fn from_opt<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

/// Extract a string, or `None` when unset or not a string.
pub fn as_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Extract an integer, or `None` when unset or not an integer.
///
/// Floats are not silently truncated; an `Int` field stays an `Int`.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(*n),
        _ => None,
    }
}

/// Extract a float, promoting integers.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(n) => Some(*n),
        Value::Int(n) => Some(*n as f64),
        _ => None,
    }
}

/// Extract a bool, or `None` when unset or not a bool.
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Build an ordered list value from string slices.
pub fn string_list<S: AsRef<str>>(items: &[S]) -> Value {
    Value::List(items.iter().map(|s| Value::from(s.as_ref())).collect())
}

/// Build a set value from string slices, preserving the given order.
pub fn string_set<S: AsRef<str>>(items: &[S]) -> Value {
    Value::Set(items.iter().map(|s| Value::from(s.as_ref())).collect())
}

/// Extract the strings of a list or set, or `None` when the value is unset,
/// not a collection, or contains a non-string element.
pub fn to_string_vec(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::List(items) | Value::Set(items) => items,
        _ => return None,
    };
    items
        .iter()
        .map(|item| as_str(item).map(str::to_string))
        .collect()
}

/// Project an unmarshalled JSON value into a [`Value`].
///
/// JSON `null` maps to [`Value::Null`]; nothing maps to [`Value::Unknown`],
/// which only Terraform plan input produces. Arrays become ordered lists —
/// the wire format cannot distinguish a set, so adapters re-tag set-typed
/// fields themselves. Integral numbers become `Int`, everything else `Float`.
pub fn value_from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::List(items.into_iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(map) => {
            let fields = map
                .into_iter()
                .map(|(name, v)| (name, value_from_json(v)))
                .collect::<BTreeMap<_, _>>();
            Value::Record(Record::from_parts(fields, BTreeSet::new()))
        }
    }
}

/// Render a [`Value`] as JSON for a request body.
///
/// `Null` and `Unknown` both render as JSON `null` — the server has no
/// notion of "unknown", only of unset.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null | Value::Unknown => serde_json::Value::Null,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Float(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::List(items) | Value::Set(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Record(record) => serde_json::Value::Object(
            record
                .fields()
                .iter()
                .map(|(name, v)| (name.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Project a JSON object into a [`Record`], marking `path_fields` as the
/// record's path identity.
///
/// Fails when the JSON value is not an object — a response that should have
/// decoded to a record but did not.
pub fn record_from_json(json: serde_json::Value, path_fields: &[&str]) -> Result<Record, CoreError> {
    let serde_json::Value::Object(map) = json else {
        return Err(CoreError::Serialization(serde_json::Error::custom(
            format!("expected a JSON object, got {}", json_kind(&json)),
        )));
    };
    let fields = map
        .into_iter()
        .map(|(name, v)| (name, value_from_json(v)))
        .collect::<BTreeMap<_, _>>();
    let path_fields = path_fields.iter().map(|s| s.to_string()).collect();
    Ok(Record::from_parts(fields, path_fields))
}

/// Project a JSON array of objects into a [`Collection`].
pub fn collection_from_json(
    json: serde_json::Value,
    path_fields: &[&str],
) -> Result<Collection, CoreError> {
    let serde_json::Value::Array(items) = json else {
        return Err(CoreError::Serialization(serde_json::Error::custom(
            format!("expected a JSON array, got {}", json_kind(&json)),
        )));
    };
    items
        .into_iter()
        .map(|item| record_from_json(item, path_fields))
        .collect()
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a bool",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
