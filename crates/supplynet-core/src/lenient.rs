//! Shape-tolerant field decoding.
//!
//! The agent runtime is free to publish partial or oddly typed state. A
//! field that does not match its declared type decodes as absent instead of
//! rejecting the whole snapshot.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::ids::ToolCallId;

/// Decode an optional field, mapping `null` and wrong shapes to `None`.
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value(value))
}

/// Decode a string field, mapping anything that is not a string to `""`.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Decode a tool call id that may arrive as a string or a number.
pub(crate) fn tool_call_id<'de, D>(deserializer: D) -> Result<ToolCallId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| {
        D::Error::custom(format!("tool call id must be a string or number, got {}", value))
    })
}

/// Optional variant of [`tool_call_id`]; other shapes decode as `None`.
pub(crate) fn tool_call_id_option<'de, D>(deserializer: D) -> Result<Option<ToolCallId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_from_value(&value))
}

fn id_from_value(value: &Value) -> Option<ToolCallId> {
    match value {
        Value::String(s) => Some(ToolCallId::new(s.clone())),
        Value::Number(n) => Some(ToolCallId::new(n.to_string())),
        _ => None,
    }
}

pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value).ok()
}
