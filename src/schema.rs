//! Field metadata types for the settings API schema
//!
//! # Overview
//!
//! Every settings key exposed by the configuration API carries a metadata
//! entry describing how the value is typed, labeled and constrained. The
//! options endpoint returns one catalogue of these entries per HTTP method
//! (readable vs. writable fields).
//!
//! The catalogue is always passed around explicitly - there is no ambient
//! metadata registry. Screens receive an [`OptionsCatalogue`] at load time
//! and hand it to the descriptor merger together with the live values.
//!
//! ```rust
//! use setforge::{FieldMetadata, choice};
//!
//! let protocol = FieldMetadata::choice("Logging Aggregator Protocol", "https", vec![
//!     choice("https", "HTTPS/HTTP"),
//!     choice("tcp", "TCP"),
//!     choice("udp", "UDP"),
//! ])
//! .help_text("Protocol used to communicate with the log aggregator.");
//!
//! let timeout = FieldMetadata::integer("TCP Connection Timeout", 5)
//!     .min(1.0)
//!     .unit("seconds");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;

// =============================================================================
// Field Types
// =============================================================================

/// Wire type of a settings field, as reported by the options endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Boolean toggle
    Boolean,
    /// Free-form text
    #[default]
    String,
    /// Integer input
    Integer,
    /// Single select from enumerated choices
    Choice,
    /// JSON array, edited as text
    List,
    /// JSON object, edited as text
    #[serde(rename = "nested object")]
    NestedObject,
    /// PEM-style certificate blob
    Certificate,
    /// URL-shaped text
    Url,
}

impl FieldType {
    /// Structured fields are edited as JSON text and re-parsed on submit
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, FieldType::List | FieldType::NestedObject)
    }
}

// =============================================================================
// Field Metadata
// =============================================================================

/// Metadata for a single settings field
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use setforge::{FieldMetadata, choice};
///
/// let enabled = FieldMetadata::boolean("Enable External Logging", false)
///     .help_text("Enable sending logs to an external aggregator.");
///
/// let commands = FieldMetadata::list("Ad Hoc Commands", json!(["command", "shell"]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Display label
    pub label: String,

    /// Help text shown next to the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    /// Wire type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Factory default value (absent entries default to null)
    #[serde(default)]
    pub default: Value,

    /// Choices for Choice type (required at construction for that type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,

    /// Minimum value for numeric fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    /// Maximum value for numeric fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    /// Unit for display ("seconds", "minutes")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Field must be non-empty on submit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    /// Value is a server-side secret; the API only ever returns the
    /// placeholder sentinel for it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub encrypted: bool,

    /// Never rendered in forms
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl Default for FieldMetadata {
    fn default() -> Self {
        Self {
            label: String::new(),
            help_text: None,
            field_type: FieldType::String,
            default: Value::Null,
            choices: None,
            min_value: None,
            max_value: None,
            unit: None,
            required: false,
            encrypted: false,
            hidden: false,
        }
    }
}

impl FieldMetadata {
    // =========================================================================
    // Type-specific constructors
    // =========================================================================

    /// Create a text field
    pub fn string(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::String,
            default: Value::String(default.into()),
            ..Default::default()
        }
    }

    /// Create a boolean toggle field
    pub fn boolean(label: impl Into<String>, default: bool) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::Boolean,
            default: Value::Bool(default),
            ..Default::default()
        }
    }

    /// Create an integer field
    pub fn integer(label: impl Into<String>, default: i64) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::Integer,
            default: json!(default),
            ..Default::default()
        }
    }

    /// Create a choice field
    ///
    /// **Choices are required** - provide them at construction time.
    pub fn choice(
        label: impl Into<String>,
        default: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::Choice,
            default: Value::String(default.into()),
            choices: Some(choices),
            ..Default::default()
        }
    }

    /// Create a list field (JSON array, edited as text)
    pub fn list(label: impl Into<String>, default: Value) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::List,
            default,
            ..Default::default()
        }
    }

    /// Create a nested-object field (JSON object, edited as text)
    pub fn nested_object(label: impl Into<String>, default: Value) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::NestedObject,
            default,
            ..Default::default()
        }
    }

    /// Create a certificate field
    pub fn certificate(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::Certificate,
            default: Value::String(String::new()),
            ..Default::default()
        }
    }

    /// Create a URL field
    pub fn url(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field_type: FieldType::Url,
            default: Value::String(default.into()),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder setters
    // =========================================================================

    /// Set the help text
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Set minimum value for numeric fields
    #[must_use]
    pub fn min(mut self, val: f64) -> Self {
        self.min_value = Some(val);
        self
    }

    /// Set maximum value for numeric fields
    #[must_use]
    pub fn max(mut self, val: f64) -> Self {
        self.max_value = Some(val);
        self
    }

    /// Set the display unit
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Mark the field as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as encrypted (server-side secret)
    #[must_use]
    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    /// Mark the field as hidden from forms
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate a wire value against this field's type and constraints
    ///
    /// Checks:
    /// - Type compatibility
    /// - Numeric range (`min_value`/`max_value`)
    /// - Choice membership
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        // null is "unset"; required-ness is a form concern, not a type one
        if value.is_null() {
            return Ok(());
        }

        match self.field_type {
            FieldType::Boolean => {
                if !value.is_boolean() {
                    return Err("Value must be a boolean".to_string());
                }
            }
            FieldType::Integer => {
                let num = value
                    .as_f64()
                    .ok_or_else(|| "Value must be a number".to_string())?;

                if let Some(min) = self.min_value {
                    if num < min {
                        return Err(format!("Value must be at least {min}"));
                    }
                }
                if let Some(max) = self.max_value {
                    if num > max {
                        return Err(format!("Value must be at most {max}"));
                    }
                }
            }
            FieldType::Choice => {
                if let Some(ref choices) = self.choices {
                    let is_valid = choices.iter().any(|c| c.value == *value);
                    if !is_valid {
                        return Err("Value must be one of the available choices".to_string());
                    }
                }
            }
            FieldType::List => {
                if !value.is_array() {
                    return Err("Value must be an array".to_string());
                }
            }
            FieldType::NestedObject => {
                if !value.is_object() {
                    return Err("Value must be an object".to_string());
                }
            }
            FieldType::String | FieldType::Certificate | FieldType::Url => {
                if !value.is_string() {
                    return Err("Value must be a string".to_string());
                }
            }
        }
        Ok(())
    }

    /// Validate the metadata definition itself
    ///
    /// - Choice type has choices
    /// - min <= max
    /// - Default satisfies the constraints
    pub fn validate_schema(&self) -> Result<(), String> {
        if self.field_type == FieldType::Choice && self.choices.is_none() {
            return Err("Choice type must have choices defined".to_string());
        }

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(format!("min ({min}) cannot be greater than max ({max})"));
            }
        }

        self.validate(&self.default)
            .map_err(|e| format!("Default value is invalid: {e}"))?;

        Ok(())
    }
}

// =============================================================================
// Choice
// =============================================================================

/// One option of a Choice field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Value sent on the wire
    pub value: Value,
    /// Display label
    pub label: String,
}

impl Choice {
    /// Create a string-valued choice
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: Value::String(value.into()),
            label: label.into(),
        }
    }
}

/// Shorthand for creating a [`Choice`]
///
/// # Example
/// ```rust
/// use setforge::choice;
/// let protocols = vec![choice("tcp", "TCP"), choice("udp", "UDP")];
/// ```
pub fn choice(value: impl Into<String>, label: impl Into<String>) -> Choice {
    Choice::new(value, label)
}

// =============================================================================
// Options Catalogue
// =============================================================================

/// Immutable catalogue of field metadata for one settings category
///
/// Sourced from the options endpoint; one instance per screen load. The
/// options endpoint scopes metadata by HTTP method, so a category load yields
/// two catalogues: the readable fields (GET) and the writable ones (PUT).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsCatalogue {
    fields: HashMap<String, FieldMetadata>,
}

impl OptionsCatalogue {
    /// Create an empty catalogue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up metadata for a key
    pub fn get(&self, key: &str) -> Option<&FieldMetadata> {
        self.fields.get(key)
    }

    /// Check whether a key has a metadata entry
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Insert a metadata entry
    pub fn insert(&mut self, key: impl Into<String>, metadata: FieldMetadata) {
        self.fields.insert(key.into(), metadata);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the catalogue is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldMetadata)> {
        self.fields.iter()
    }

    /// Iterate over keys
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Validate every entry's schema definition
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry as `(key, reason)`.
    pub fn validate_schema(&self) -> Result<(), (String, String)> {
        for (key, metadata) in &self.fields {
            metadata
                .validate_schema()
                .map_err(|reason| (key.clone(), reason))?;
        }
        Ok(())
    }
}

impl From<HashMap<String, FieldMetadata>> for OptionsCatalogue {
    fn from(fields: HashMap<String, FieldMetadata>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, FieldMetadata)> for OptionsCatalogue {
    fn from_iter<I: IntoIterator<Item = (String, FieldMetadata)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Macro for building an [`OptionsCatalogue`] more cleanly
///
/// # Example
/// ```rust
/// use setforge::{catalogue, FieldMetadata};
///
/// let options = catalogue! {
///     "LOG_AGGREGATOR_HOST" => FieldMetadata::string("Logging Aggregator", ""),
///     "LOG_AGGREGATOR_PORT" => FieldMetadata::integer("Logging Aggregator Port", 514),
/// };
/// ```
#[macro_export]
macro_rules! catalogue {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), $value);
        )*
        $crate::OptionsCatalogue::from(map)
    }};
}

// =============================================================================
// Tests
// =============================================================================
