//! Event system for form value changes
//!
//! Callers can observe field edits (e.g. to refresh a dependent widget) and
//! register extra per-field validators that run during the pre-submit pass,
//! on top of the metadata-driven checks.

use crate::sync::RwLockExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Type alias for a change callback, receiving (key, old value, new value)
pub type ChangeCallback = Arc<dyn Fn(&str, &Value, &Value) + Send + Sync>;

/// Type alias for a validator function
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Manages change listeners and extra validators for a form
pub struct EventManager {
    /// Global listeners (called for every field change)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Extra validators per key
    validators: RwLock<HashMap<String, Vec<Validator>>>,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            validators: RwLock::new(HashMap::new()),
        }
    }

    /// Register a global change listener
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        let mut guard = self
            .global_listeners
            .write_recovered()
            .expect("Lock poisoned");
        guard.push(Arc::new(callback));
    }

    /// Register a listener for one settings key
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&str, &Value, &Value) + Send + Sync + 'static,
    {
        let mut listeners = self.key_listeners.write_recovered().expect("Lock poisoned");
        listeners
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register an extra validator for one settings key.
    ///
    /// Validators run during the pre-submit validation pass; any failure
    /// blocks the submit.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_validator<F>(&self, key: &str, validator: F)
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        let mut validators = self.validators.write_recovered().expect("Lock poisoned");
        validators
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(validator));
    }

    /// Run the extra validators for a key.
    ///
    /// # Errors
    ///
    /// Returns the first validation error message if any validator fails.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn validate(&self, key: &str, value: &Value) -> Result<(), String> {
        let guard = self.validators.read_recovered().expect("Lock poisoned");
        if let Some(validators) = guard.get(key) {
            for validator in validators {
                validator(value)?;
            }
        }
        Ok(())
    }

    /// Notify listeners about a field change
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn notify(&self, key: &str, old_value: &Value, new_value: &Value) {
        {
            let guard = self
                .global_listeners
                .read_recovered()
                .expect("Lock poisoned");
            for callback in guard.iter() {
                callback(key, old_value, new_value);
            }
        }

        {
            let guard = self.key_listeners.read_recovered().expect("Lock poisoned");
            if let Some(listeners) = guard.get(key) {
                for callback in listeners {
                    callback(key, old_value, new_value);
                }
            }
        }
    }

    /// Remove all listeners for one key
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn unwatch(&self, key: &str) {
        let mut guard = self.key_listeners.write_recovered().expect("Lock poisoned");
        guard.remove(key);
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
