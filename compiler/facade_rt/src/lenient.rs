//! Boolean coercion for wire values.
//!
//! Some servers send booleans as strings or integers. The string `"false"`
//! and the empty string are false, any other string is true, and numbers
//! are true when non-zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a wire value to a boolean, if it has a boolean reading.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(!(s.is_empty() || s == "false")),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Some(i != 0),
            (_, Some(u), _) => Some(u != 0),
            (_, _, Some(f)) => Some(f != 0.0),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// `deserialize_with` helper for optional boolean fields.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    coerce_bool(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a boolean, found {value}")))
}
