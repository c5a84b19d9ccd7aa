//! Error types for setforge

use thiserror::Error;

/// Result type alias for setforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for setforge
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // API Errors
    // -------------------------------------------------------------------------
    #[error("Failed to load settings category '{slug}': {reason}")]
    Fetch { slug: String, reason: String },

    #[error("Failed to save settings category '{slug}': {reason}")]
    Submit { slug: String, reason: String },

    #[error("Failed to revert settings category '{slug}': {reason}")]
    Revert { slug: String, reason: String },

    #[error("Lookup failed for {resource} '{id}': {reason}")]
    Lookup {
        resource: String,
        id: String,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid JSON for field {key}: {reason}")]
    Parse { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Form Errors
    // -------------------------------------------------------------------------
    #[error("Invalid value for field {key}: {reason}")]
    Validation { key: String, reason: String },

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Unknown settings category: {0}")]
    UnknownCategory(String),

    #[error("No metadata entry for field: {0}")]
    MetadataMissing(String),

    // -------------------------------------------------------------------------
    // Upload Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read upload '{name}': {source}")]
    UploadRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::FieldNotFound(_) | Error::UnknownCategory(_) | Error::MetadataMissing(_)
        )
    }

    /// Check if this error should be surfaced inline on the edit screen
    /// (as opposed to replacing the whole view with an error state)
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Error::Submit { .. }
                | Error::Revert { .. }
                | Error::Parse { .. }
                | Error::Validation { .. }
        )
    }

    /// Build a fetch error for a category slug
    pub(crate) fn fetch(slug: &str, reason: impl Into<String>) -> Self {
        Error::Fetch {
            slug: slug.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a submit error for a category slug
    pub(crate) fn submit(slug: &str, reason: impl Into<String>) -> Self {
        Error::Submit {
            slug: slug.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a revert error for a category slug
    pub(crate) fn revert(slug: &str, reason: impl Into<String>) -> Self {
        Error::Revert {
            slug: slug.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
