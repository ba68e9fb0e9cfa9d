//! Typed reads of untyped JSON payload fields.
//!
//! A field of the wrong JSON type is recorded as a [`FieldError`] so the
//! validator reports it with its path instead of failing the whole body.

use engine::FieldError;
use serde_json::Value;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `null` counts as absent.
pub(crate) fn string(
    field: &str,
    value: Option<Value>,
    mistyped: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            mistyped.push(FieldError::wrong_type(field, "string", kind(&other)));
            None
        }
    }
}

/// `null` counts as absent.
pub(crate) fn number(
    field: &str,
    value: Option<Value>,
    mistyped: &mut Vec<FieldError>,
) -> Option<f64> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_f64(),
        Some(other) => {
            mistyped.push(FieldError::wrong_type(field, "number", kind(&other)));
            None
        }
    }
}
