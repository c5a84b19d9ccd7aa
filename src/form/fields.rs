//! Input-level validation for typed fields
//!
//! Each check mirrors what the corresponding field widget enforces: required
//! non-emptiness, URL shape, numeric range, choice membership, and JSON parse
//! for structured fields. A failing field only ever reports its own error.

use crate::codec;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::schema::{FieldMetadata, FieldType};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://\S+$").expect("valid url pattern"))
}

/// Whether input text counts as empty for required-field purposes
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Validate one field's text and produce its wire value.
///
/// Runs, in order: required check, JSON/scalar decode, URL-shape check,
/// metadata constraints (type, range, choices), then any extra validators
/// registered on the event manager.
///
/// # Errors
///
/// `Error::Validation` or `Error::Parse` naming the offending key.
pub fn validate_input(
    key: &str,
    metadata: &FieldMetadata,
    text: &str,
    required: bool,
    events: &EventManager,
) -> Result<Value> {
    if required && is_blank(text) {
        return Err(Error::Validation {
            key: key.to_string(),
            reason: "This field must not be blank".to_string(),
        });
    }

    let value = codec::decode(text, metadata.field_type, key)?;

    if metadata.field_type == FieldType::Url && !is_blank(text) && !url_pattern().is_match(text) {
        return Err(Error::Validation {
            key: key.to_string(),
            reason: "Please enter a valid URL".to_string(),
        });
    }

    metadata.validate(&value).map_err(|reason| Error::Validation {
        key: key.to_string(),
        reason,
    })?;

    events.validate(key, &value).map_err(|reason| Error::Validation {
        key: key.to_string(),
        reason,
    })?;

    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================
