//! Per-field revert/undo tracking
//!
//! Each field remembers three values: the factory default from its metadata,
//! the value that was loaded when the form opened (initial), and the value
//! currently in the input. From those, exactly one action is ever exposed:
//!
//! - **Revert** - current differs from the default; applying it sets the
//!   field to the default.
//! - **Undo** - current already equals the default but the loaded value did
//!   not; applying it goes back to the loaded value.
//! - Nothing, when current, default and initial all agree.

use serde_json::Value;
use std::sync::Arc;

/// Callback fired after a revert/undo is applied, for side-effect cleanup
/// (e.g. clearing the name of an uploaded file)
pub type RevertCallback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Diff state of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertState {
    /// Current, default and initial all match - no action
    MatchesDefault,
    /// Current differs from the default - "Revert" is exposed
    Revertable,
    /// Current equals the default but the loaded value did not - "Undo"
    Undoable,
}

/// The action a revert control exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertAction {
    /// Set the field to its factory default
    Revert,
    /// Set the field back to the value loaded at form-open time
    Undo,
}

impl RevertAction {
    /// Control label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RevertAction::Revert => "Revert",
            RevertAction::Undo => "Undo",
        }
    }
}

/// Tracks default/initial/current for one field
#[derive(Clone)]
pub struct RevertTracker {
    key: String,
    default: Value,
    initial: Value,
    current: Value,
    on_revert: Option<RevertCallback>,
}

impl std::fmt::Debug for RevertTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevertTracker")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field("state", &self.state())
            .finish()
    }
}

impl RevertTracker {
    /// Create a tracker for a freshly loaded field (current == initial)
    pub fn new(key: impl Into<String>, default: Value, initial: Value) -> Self {
        let current = initial.clone();
        Self {
            key: key.into(),
            default,
            initial,
            current,
            on_revert: None,
        }
    }

    /// Attach a cleanup callback fired after revert/undo is applied
    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.on_revert = Some(Arc::new(callback));
        self
    }

    /// Settings key this tracker belongs to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The factory default
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// The value loaded at form-open time
    pub fn initial(&self) -> &Value {
        &self.initial
    }

    /// The current value
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Record a user edit
    pub fn set_current(&mut self, value: Value) {
        self.current = value;
    }

    /// Current diff state
    #[must_use]
    pub fn state(&self) -> RevertState {
        if self.current != self.default {
            RevertState::Revertable
        } else if self.initial != self.default {
            RevertState::Undoable
        } else {
            RevertState::MatchesDefault
        }
    }

    /// The exposed action, if any
    #[must_use]
    pub fn action(&self) -> Option<RevertAction> {
        match self.state() {
            RevertState::Revertable => Some(RevertAction::Revert),
            RevertState::Undoable => Some(RevertAction::Undo),
            RevertState::MatchesDefault => None,
        }
    }

    /// Whether the control is enabled (there is something to revert or undo)
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.action().is_some()
    }

    /// Apply the exposed action and fire the cleanup callback.
    ///
    /// Returns the new current value, or `None` when nothing was applicable.
    pub fn apply(&mut self) -> Option<Value> {
        let target = match self.action()? {
            RevertAction::Revert => self.default.clone(),
            RevertAction::Undo => self.initial.clone(),
        };
        self.current = target.clone();
        if let Some(ref cb) = self.on_revert {
            cb(&self.key, &target);
        }
        Some(target)
    }
}

// =============================================================================
// Tests
// =============================================================================
