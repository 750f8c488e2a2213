//! Field deserializers that treat values of the wrong type as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Reads a JSON number, ignoring anything else.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value))
}

/// Reads a JSON string, ignoring anything else.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        other => {
            warn!(value = %other, "ignoring non-string value");
            Ok(None)
        }
    }
}

/// Reads a JSON array of numbers; non-numeric elements keep their slot empty.
pub(crate) fn numbers<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(items.iter().map(as_number).collect())),
        other => {
            warn!(value = %other, "ignoring non-array value");
            Ok(None)
        }
    }
}

/// Reads a JSON array, keeping only its object elements.
pub(crate) fn objects<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(only_objects(items)),
        other => {
            warn!(value = %other, "ignoring non-array value");
            Ok(Vec::new())
        }
    }
}

pub(crate) fn only_objects(items: Vec<Value>) -> Vec<Value> {
    let total = items.len();
    let objects: Vec<Value> = items.into_iter().filter(Value::is_object).collect();
    if objects.len() != total {
        warn!(skipped = total - objects.len(), "skipping non-object entries");
    }
    objects
}

fn as_number(value: &Value) -> Option<f64> {
    let number = value.as_f64();
    if number.is_none() {
        warn!(%value, "ignoring non-numeric value");
    }
    number
}
