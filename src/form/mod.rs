//! Form state for a settings category edit screen
//!
//! [`FormState`] is the headless stand-in for the screen's field widgets: it
//! owns one input per descriptor (text, touched flag, field-level error),
//! per-field revert/undo trackers, the passthrough values that round-trip
//! unchanged, and the category's visibility and destructive-toggle rules.
//!
//! The state never talks to the network; the submission controller feeds it
//! on load and drains it on submit.

pub mod fields;
pub mod upload;

pub use upload::FileUpload;

use crate::api::CategoryValues;
use crate::category;
use crate::codec::{self, ENCRYPTED_PLACEHOLDER};
use crate::descriptor::MergeOutcome;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::revert::{RevertAction, RevertState, RevertTracker};
use crate::schema::{FieldMetadata, FieldType};
use log::debug;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One field's input state
#[derive(Debug)]
pub struct FormField {
    metadata: FieldMetadata,
    text: String,
    touched: bool,
    error: Option<String>,
    tracker: RevertTracker,
    /// Placeholder was cleared on focus and nothing was typed yet
    editing_secret: bool,
}

impl FormField {
    fn new(key: &str, metadata: FieldMetadata, value: Value) -> Self {
        let text = codec::encode(&value, metadata.field_type);
        let tracker = RevertTracker::new(key, metadata.default.clone(), value);
        Self {
            metadata,
            text,
            touched: false,
            error: None,
            tracker,
            editing_secret: false,
        }
    }

    /// Field metadata
    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    /// Current input text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the user has edited this field
    pub fn touched(&self) -> bool {
        self.touched
    }

    /// Field-level error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current wire value (last successfully decoded)
    pub fn value(&self) -> &Value {
        self.tracker.current()
    }

    /// Diff state against default and initial values
    pub fn revert_state(&self) -> RevertState {
        self.tracker.state()
    }

    /// The exposed revert control action, if any
    pub fn revert_action(&self) -> Option<RevertAction> {
        self.tracker.action()
    }

    /// Whether the revert control is enabled
    pub fn revert_enabled(&self) -> bool {
        self.tracker.is_enabled()
    }
}

/// Result of requesting a boolean toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The toggle was applied immediately
    Applied(bool),
    /// The toggle is destructive and awaits [`FormState::confirm_toggle`]
    NeedsConfirmation {
        /// The field being toggled
        key: String,
        /// The value a confirmation would apply
        target: bool,
    },
}

/// Mutable state of one category edit form
pub struct FormState {
    slug: String,
    fields: BTreeMap<String, FormField>,
    passthrough: BTreeMap<String, Value>,
    events: Arc<EventManager>,
    pending_toggle: Option<(String, bool)>,
    /// Uploaded file name per field, cleared when the field reverts
    uploads: HashMap<String, String>,
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("slug", &self.slug)
            .field("fields", &self.fields)
            .field("passthrough", &self.passthrough)
            .field("pending_toggle", &self.pending_toggle)
            .field("uploads", &self.uploads)
            .finish_non_exhaustive()
    }
}

impl FormState {
    /// Build form state from a strict merge outcome
    pub fn new(slug: impl Into<String>, outcome: MergeOutcome, events: Arc<EventManager>) -> Self {
        let slug = slug.into();
        let fields: BTreeMap<String, FormField> = outcome
            .descriptors
            .into_iter()
            .map(|(key, d)| (key.clone(), FormField::new(&key, d.metadata, d.value)))
            .collect();

        debug!(
            "Built form state for '{slug}': {} fields, {} passthrough keys",
            fields.len(),
            outcome.passthrough.len()
        );

        Self {
            slug,
            fields,
            passthrough: outcome.passthrough,
            events,
            pending_toggle: None,
            uploads: HashMap::new(),
        }
    }

    /// Category slug this form edits
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Number of renderable fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the form has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up one field
    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.get(key)
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormField)> {
        self.fields.iter()
    }

    /// Current wire value of a field
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).map(|f| f.tracker.current())
    }

    /// Whether any field differs from its loaded value
    pub fn is_dirty(&self) -> bool {
        self.fields
            .values()
            .any(|f| f.tracker.current() != f.tracker.initial())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Record a text edit.
    ///
    /// The text always sticks; if it decodes, the field's wire value follows
    /// and change listeners fire. If it does not (structured field with
    /// invalid JSON), the parse error is recorded on the field alone and
    /// other fields stay editable.
    ///
    /// # Errors
    ///
    /// Only `Error::FieldNotFound`; decode problems are field-level state.
    pub fn set_text(&mut self, key: &str, text: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| Error::FieldNotFound(key.to_string()))?;

        field.text = text.into();
        field.touched = true;
        field.editing_secret = false;

        match codec::decode(&field.text, field.metadata.field_type, key) {
            Ok(value) => {
                field.error = None;
                let old = field.tracker.current().clone();
                field.tracker.set_current(value.clone());
                self.events.notify(key, &old, &value);
            }
            Err(e) => {
                field.error = Some(e.to_string());
            }
        }
        Ok(())
    }

    /// Set a field's wire value directly (toggles, selects, uploads)
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotFound` for an unknown key.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| Error::FieldNotFound(key.to_string()))?;

        field.text = codec::encode(&value, field.metadata.field_type);
        field.touched = true;
        field.error = None;
        field.editing_secret = false;
        let old = field.tracker.current().clone();
        field.tracker.set_current(value.clone());
        self.events.notify(key, &old, &value);
        Ok(())
    }

    /// Focus an encrypted input: the placeholder empties so the user types a
    /// fresh secret rather than editing the sentinel.
    pub fn focus(&mut self, key: &str) {
        if let Some(field) = self.fields.get_mut(key) {
            if field.metadata.encrypted && field.text == ENCRYPTED_PLACEHOLDER {
                field.text.clear();
                field.editing_secret = true;
            }
        }
    }

    /// Blur an encrypted input: leaving without typing restores the
    /// placeholder (the secret stays set server-side).
    pub fn blur(&mut self, key: &str) {
        if let Some(field) = self.fields.get_mut(key) {
            if field.metadata.encrypted && field.editing_secret && fields::is_blank(&field.text) {
                field.text = ENCRYPTED_PLACEHOLDER.to_string();
                field.editing_secret = false;
            }
        }
    }

    // =========================================================================
    // Toggles
    // =========================================================================

    /// Request flipping a boolean field.
    ///
    /// Destructive toggles (per the category registry) are not applied
    /// directly; the caller shows a confirmation and then calls
    /// [`confirm_toggle`](Self::confirm_toggle) or
    /// [`cancel_toggle`](Self::cancel_toggle).
    ///
    /// # Errors
    ///
    /// `Error::FieldNotFound` for an unknown key, `Error::Validation` when
    /// the field is not a boolean.
    pub fn request_toggle(&mut self, key: &str) -> Result<ToggleOutcome> {
        let field = self
            .fields
            .get(key)
            .ok_or_else(|| Error::FieldNotFound(key.to_string()))?;

        if field.metadata.field_type != FieldType::Boolean {
            return Err(Error::Validation {
                key: key.to_string(),
                reason: "Only boolean fields can be toggled".to_string(),
            });
        }

        let target = !field.tracker.current().as_bool().unwrap_or(false);

        if category::destructive_toggles(&self.slug).contains(&key) {
            self.pending_toggle = Some((key.to_string(), target));
            return Ok(ToggleOutcome::NeedsConfirmation {
                key: key.to_string(),
                target,
            });
        }

        self.set_value(key, Value::Bool(target))?;
        Ok(ToggleOutcome::Applied(target))
    }

    /// Pending destructive toggle, if one awaits confirmation
    pub fn pending_toggle(&self) -> Option<(&str, bool)> {
        self.pending_toggle.as_ref().map(|(k, t)| (k.as_str(), *t))
    }

    /// Confirm the pending destructive toggle and apply it
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotFound` if the pending field vanished.
    pub fn confirm_toggle(&mut self) -> Result<Option<bool>> {
        match self.pending_toggle.take() {
            Some((key, target)) => {
                self.set_value(&key, Value::Bool(target))?;
                Ok(Some(target))
            }
            None => Ok(None),
        }
    }

    /// Dismiss the pending destructive toggle, leaving the field unchanged
    pub fn cancel_toggle(&mut self) {
        self.pending_toggle = None;
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Ingest an uploaded file into a field.
    ///
    /// `as_data_url` selects base64 `data:` URL encoding (logo fields);
    /// otherwise the file must be UTF-8 text (certificates, metadata XML).
    ///
    /// # Errors
    ///
    /// `Error::FieldNotFound` or `Error::UploadRead`.
    pub fn attach_upload(&mut self, key: &str, upload: &FileUpload, as_data_url: bool) -> Result<()> {
        if !self.fields.contains_key(key) {
            return Err(Error::FieldNotFound(key.to_string()));
        }
        let value = if as_data_url {
            upload.to_data_url()
        } else {
            upload.as_text()?
        };
        self.set_value(key, Value::String(value))?;
        self.uploads.insert(key.to_string(), upload.name().to_string());
        Ok(())
    }

    /// Name of the file currently uploaded into a field
    pub fn upload_name(&self, key: &str) -> Option<&str> {
        self.uploads.get(key).map(String::as_str)
    }

    // =========================================================================
    // Revert / Undo
    // =========================================================================

    /// Apply a field's exposed revert/undo action.
    ///
    /// Syncs the input text, clears the field error and any uploaded file
    /// name, and notifies change listeners. Returns the applied value, or
    /// `None` when the control was disabled.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotFound` for an unknown key.
    pub fn revert_field(&mut self, key: &str) -> Result<Option<Value>> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| Error::FieldNotFound(key.to_string()))?;

        let old = field.tracker.current().clone();
        let Some(value) = field.tracker.apply() else {
            return Ok(None);
        };

        field.text = codec::encode(&value, field.metadata.field_type);
        field.error = None;
        field.editing_secret = false;
        self.uploads.remove(key);
        self.events.notify(key, &old, &value);
        Ok(Some(value))
    }

    /// Attach a cleanup callback to one field's revert tracker
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotFound` for an unknown key.
    pub fn set_revert_callback<F>(&mut self, key: &str, callback: F) -> Result<()>
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| Error::FieldNotFound(key.to_string()))?;
        field.tracker = field.tracker.clone().with_callback(callback);
        Ok(())
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Whether a field is currently shown, per the category's rules
    pub fn is_visible(&self, key: &str) -> bool {
        let rules = category::visibility_rules(&self.slug);
        let Some(rule) = rules.iter().find(|r| r.field == key) else {
            return true;
        };
        let Some(controller) = self.value(rule.controller) else {
            return true;
        };
        controller
            .as_str()
            .map(|v| rule.show_when.contains(&v))
            .unwrap_or(false)
    }

    /// Whether a field is required right now (metadata-required, or made
    /// required by a visibility rule while shown)
    pub fn is_required(&self, key: &str) -> bool {
        let Some(field) = self.fields.get(key) else {
            return false;
        };
        if field.metadata.required {
            return true;
        }
        category::visibility_rules(&self.slug)
            .iter()
            .any(|r| r.field == key && r.required_when_visible && self.is_visible(key))
    }

    // =========================================================================
    // Validation & payload
    // =========================================================================

    /// Run the full validation pass over every visible field.
    ///
    /// Per-field errors are recorded on the fields (and cleared when a field
    /// passes); the first failure is also returned so callers can refuse to
    /// submit.
    ///
    /// # Errors
    ///
    /// The first `Error::Validation` or `Error::Parse` encountered.
    pub fn validate_all(&mut self) -> Result<()> {
        let keys: Vec<String> = self.fields.keys().cloned().collect();
        let mut first_error: Option<Error> = None;

        for key in keys {
            if !self.is_visible(&key) {
                continue;
            }
            let required = self.is_required(&key);
            let Some(field) = self.fields.get_mut(&key) else {
                continue;
            };

            match fields::validate_input(&key, &field.metadata, &field.text, required, &self.events)
            {
                Ok(_) => field.error = None,
                Err(e) => {
                    field.error = Some(e.to_string());
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Assemble the submit payload.
    ///
    /// Structured fields are re-decoded from their text, fields hidden by a
    /// visibility rule are omitted, encrypted fields still holding the
    /// placeholder are omitted (secret unchanged), and passthrough keys are
    /// merged back in unchanged.
    ///
    /// # Errors
    ///
    /// `Error::Parse` when a structured field's text is invalid; run
    /// [`validate_all`](Self::validate_all) first to surface those properly.
    pub fn payload(&self) -> Result<CategoryValues> {
        let mut payload: CategoryValues = self.passthrough.clone();

        for (key, field) in &self.fields {
            if !self.is_visible(key) {
                continue;
            }
            if field.metadata.encrypted && codec::is_placeholder(field.tracker.current()) {
                continue;
            }
            let value = codec::decode(&field.text, field.metadata.field_type, key)?;
            payload.insert(key.clone(), value);
        }

        Ok(payload)
    }
}

// =============================================================================
// Tests
// =============================================================================
