//! Wire/text codec for form fields
//!
//! Structured fields (lists and nested objects) are edited as JSON text and
//! re-parsed on submit; scalars pass through as plain text with `null`
//! coalescing to the empty string. Encoding is deterministic: object keys are
//! sorted recursively before pretty-printing so two loads of the same value
//! always produce the same (diffable) text.

use crate::error::{Error, Result};
use crate::schema::FieldType;
use serde_json::{Map, Value};

/// Sentinel returned by the API for secret fields that are set.
///
/// The real secret never reaches the client; this placeholder means "a value
/// exists" and is distinct from an empty/cleared value.
pub const ENCRYPTED_PLACEHOLDER: &str = "$encrypted$";

/// Indent used when pretty-printing structured fields
const INDENT: &[u8] = b"  ";

/// Check whether a wire value is the encrypted placeholder
#[must_use]
pub fn is_placeholder(value: &Value) -> bool {
    value.as_str() == Some(ENCRYPTED_PLACEHOLDER)
}

/// Encode a wire value into its form-text representation.
///
/// Structured fields render as 2-space-indented JSON with object keys sorted
/// recursively (array order is preserved). Scalars render as their plain
/// text; `null` renders as `""`.
#[must_use]
pub fn encode(value: &Value, field_type: FieldType) -> String {
    if field_type.is_structured() {
        let sorted = sort_keys(value);
        return pretty_print(&sorted);
    }

    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode form text back into a wire value.
///
/// The inverse of [`encode`]: structured fields are parsed as JSON (empty
/// text decodes to the type's empty value), scalars are coerced to the
/// field's wire type. Invalid JSON in a structured field is a field-level
/// [`Error::Parse`].
pub fn decode(text: &str, field_type: FieldType, key: &str) -> Result<Value> {
    if field_type.is_structured() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(match field_type {
                FieldType::List => Value::Array(Vec::new()),
                _ => Value::Object(Map::new()),
            });
        }
        return serde_json::from_str(trimmed).map_err(|e| Error::Parse {
            key: key.to_string(),
            reason: e.to_string(),
        });
    }

    match field_type {
        FieldType::Boolean => match text.trim() {
            "" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(Error::Parse {
                key: key.to_string(),
                reason: format!("expected 'true' or 'false', got '{other}'"),
            }),
        },
        FieldType::Integer => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| Error::Parse {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => {
            if text.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::String(text.to_string()))
            }
        }
    }
}

/// Recursively sort object keys; arrays keep their order
#[must_use]
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<(&String, &Value)> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Pretty-print with a 2-space indent
fn pretty_print(value: &Value) -> String {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    // serialization of an in-memory Value cannot fail
    serde::Serialize::serialize(value, &mut serializer).unwrap_or_default();
    String::from_utf8(out).unwrap_or_default()
}

// =============================================================================
// Tests
// =============================================================================
