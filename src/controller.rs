//! Load / submit / revert orchestration for one settings category
//!
//! [`FormController`] is the glue between the [`SettingsApi`] client and the
//! in-memory [`FormState`]: it loads the edit form (metadata + values, merged
//! strictly), gates submits behind the validation pass, reverts the whole
//! category behind an explicit confirmation, and builds the read-only detail
//! view. Successful submits and reverts hand back a [`Navigation`] so the
//! embedding shell leaves the edit screen exactly once.

use crate::api::{CategoryValues, SettingsApi};
use crate::category::{self, Category};
use crate::codec;
use crate::descriptor::{merge_permissive, merge_strict};
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::form::FormState;
use crate::schema::FieldType;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

/// Where the shell should navigate after a successful submit or revert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Target route
    pub route: String,
}

/// One row of the read-only detail screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    /// Settings key
    pub key: String,
    /// Display label (metadata label, or the key itself when unknown)
    pub label: String,
    /// Rendered value text
    pub display: String,
}

/// Read-only rendering of a category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailView {
    /// Rows in key order
    pub rows: Vec<DetailRow>,
}

/// Drives one category's screens against a [`SettingsApi`] client
pub struct FormController<A: SettingsApi> {
    api: A,
    category: &'static Category,
    events: Arc<EventManager>,
}

impl<A: SettingsApi> std::fmt::Debug for FormController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl<A: SettingsApi> FormController<A> {
    /// Create a controller for a category slug
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCategory` for an unregistered slug.
    pub fn new(api: A, slug: &str) -> Result<Self> {
        Ok(Self {
            api,
            category: category::find(slug)?,
            events: Arc::new(EventManager::new()),
        })
    }

    /// The category this controller drives
    pub fn category(&self) -> &'static Category {
        self.category
    }

    /// Event manager shared with forms built by [`load`](Self::load)
    pub fn events(&self) -> &Arc<EventManager> {
        &self.events
    }

    /// Underlying API client
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Load the edit form: writable metadata plus live values, merged
    /// strictly. Either request failing yields exactly one error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` when either request fails.
    pub fn load(&self) -> Result<FormState> {
        let slug = self.category.slug;
        let options = self.api.read_options(slug)?;
        let values = self.api.read_category(slug)?;

        // Edit screens render the writable catalogue; an API that scopes no
        // PUT metadata (read-only token) falls back to the readable one.
        let catalogue = if options.put.is_empty() {
            &options.get
        } else {
            &options.put
        };

        let outcome = merge_strict(catalogue, &values);
        debug!(
            "Loaded '{slug}': {} fields, {} passthrough keys",
            outcome.descriptors.len(),
            outcome.passthrough.len()
        );
        Ok(FormState::new(slug, outcome, self.events.clone()))
    }

    /// Validate and submit the whole form atomically.
    ///
    /// Validation failures never reach the API; a passing form is sent as one
    /// update covering every visible field plus the passthrough keys.
    ///
    /// # Errors
    ///
    /// The first validation error, or `Error::Submit` from the API.
    pub fn submit(&self, form: &mut FormState) -> Result<Navigation> {
        form.validate_all()?;
        let payload = form.payload()?;
        self.api.update_all(self.category.slug, &payload)?;
        info!(
            "Saved settings category '{}' ({} keys)",
            self.category.slug,
            payload.len()
        );
        Ok(Navigation {
            route: self.category.details_route(),
        })
    }

    /// Revert every value of the category to its factory default.
    ///
    /// Does nothing (and stays on the edit screen) until the caller passes
    /// `confirmed = true`; the operation is one API call regardless of field
    /// count.
    ///
    /// # Errors
    ///
    /// Returns `Error::Revert` from the API.
    pub fn revert_all(&self, confirmed: bool) -> Result<Option<Navigation>> {
        if !confirmed {
            return Ok(None);
        }
        self.api.revert_category(self.category.slug)?;
        info!("Reverted settings category '{}'", self.category.slug);
        Ok(Some(Navigation {
            route: self.category.details_route(),
        }))
    }

    /// Flip one boolean setting and save it immediately (list-screen quick
    /// toggle, no edit session). When the API rejects the save, the
    /// in-memory value flips back so the widget stays truthful.
    ///
    /// # Errors
    ///
    /// `Error::FieldNotFound`, or `Error::Submit` from the API.
    pub fn quick_toggle(&self, form: &mut FormState, key: &str) -> Result<bool> {
        let current = form
            .value(key)
            .ok_or_else(|| Error::FieldNotFound(key.to_string()))?
            .as_bool()
            .unwrap_or(false);
        let target = !current;

        form.set_value(key, Value::Bool(target))?;

        let mut payload = CategoryValues::new();
        payload.insert(key.to_string(), Value::Bool(target));
        if let Err(e) = self.api.update_all(self.category.slug, &payload) {
            warn!("Quick save of {key} failed, rolling back: {e}");
            form.set_value(key, Value::Bool(current))?;
            return Err(e);
        }
        Ok(target)
    }

    /// Build the read-only detail view: every value renders, metadata or not.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` when either request fails.
    pub fn details(&self) -> Result<DetailView> {
        let slug = self.category.slug;
        let options = self.api.read_options(slug)?;
        let values = self.api.read_category(slug)?;

        let rows = merge_permissive(&options.get, &values)
            .into_iter()
            .map(|entry| {
                let label = entry
                    .metadata
                    .as_ref()
                    .map(|m| m.label.clone())
                    .unwrap_or_else(|| entry.key.clone());
                let display = self.render_value(&entry.key, entry.metadata.as_ref().map(|m| m.field_type), &entry.value);
                DetailRow {
                    key: entry.key,
                    label,
                    display,
                }
            })
            .collect();

        Ok(DetailView { rows })
    }

    /// Render one value for display. Execution-environment references on the
    /// jobs screen resolve to the environment's name; a failed lookup falls
    /// back to the raw id rather than sinking the whole view.
    fn render_value(&self, key: &str, field_type: Option<FieldType>, value: &Value) -> String {
        if self.category.slug == "jobs" && key == "DEFAULT_EXECUTION_ENVIRONMENT" {
            if let Some(id) = value.as_u64() {
                match self.api.read_execution_environment(id) {
                    Ok(env) => return env.name,
                    Err(e) => warn!("Could not resolve execution environment {id}: {e}"),
                }
            }
        }

        let field_type = field_type.unwrap_or_else(|| match value {
            Value::Object(_) => FieldType::NestedObject,
            Value::Array(_) => FieldType::List,
            Value::Bool(_) => FieldType::Boolean,
            Value::Number(_) => FieldType::Integer,
            _ => FieldType::String,
        });
        codec::encode(value, field_type)
    }
}

// =============================================================================
// Tests
// =============================================================================
