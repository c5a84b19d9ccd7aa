//! # setforge - Settings Form Engine
//!
//! A headless, framework-agnostic Rust library for driving admin-console
//! settings screens against a remote configuration API: metadata/value
//! merging, typed input validation, per-field revert/undo, and atomic
//! category submits.
//!
//! ## Features
//!
//! - **Descriptor Merging**: Combine the API's field metadata catalogues with
//!   live category values into renderable descriptors; unknown keys round-trip
//!   untouched
//! - **Typed Validation**: Required, URL-shape, numeric-range, choice and
//!   JSON-parse checks per field, plus caller-registered validators
//! - **Revert & Undo**: Each field tracks its factory default and loaded
//!   value, exposing exactly one of "Revert" or "Undo" at a time
//! - **Encrypted Fields**: `$encrypted$` placeholder handling - untouched
//!   secrets never re-submit, focus/blur behaves like the real widget
//! - **Destructive Toggles**: Registry-driven confirmation gates before
//!   flipping dangerous booleans
//! - **Atomic Submit**: One validated update per category, with a single
//!   navigation on success; category-wide revert behind confirmation
//! - **HTTP Client**: Blocking JSON client for the settings endpoints
//!   (requires the `http` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use setforge::{catalogue, choice, merge_strict, EventManager, FieldMetadata, FormState};
//! use serde_json::json;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! // Metadata as the options endpoint would describe it
//! let options = catalogue! {
//!     "LOG_AGGREGATOR_HOST" => FieldMetadata::string("Logging Aggregator", ""),
//!     "LOG_AGGREGATOR_PROTOCOL" => FieldMetadata::choice("Protocol", "https", vec![
//!         choice("https", "HTTPS/HTTP"),
//!         choice("tcp", "TCP"),
//!         choice("udp", "UDP"),
//!     ]),
//!     "LOG_AGGREGATOR_TCP_TIMEOUT" => FieldMetadata::integer("TCP Connection Timeout", 5)
//!         .min(1.0).unit("seconds"),
//! };
//!
//! // Live values as the category endpoint returns them
//! let values: BTreeMap<String, serde_json::Value> = [
//!     ("LOG_AGGREGATOR_HOST".to_string(), json!("logs.example.org")),
//!     ("LOG_AGGREGATOR_PROTOCOL".to_string(), json!("udp")),
//!     ("LOG_AGGREGATOR_TCP_TIMEOUT".to_string(), json!(5)),
//! ].into();
//!
//! let mut form = FormState::new(
//!     "logging",
//!     merge_strict(&options, &values),
//!     Arc::new(EventManager::new()),
//! );
//!
//! // udp hides the TCP timeout; switching protocols shows and requires it
//! assert!(!form.is_visible("LOG_AGGREGATOR_TCP_TIMEOUT"));
//! form.set_value("LOG_AGGREGATOR_PROTOCOL", json!("tcp")).unwrap();
//! assert!(form.is_visible("LOG_AGGREGATOR_TCP_TIMEOUT"));
//! assert!(form.is_required("LOG_AGGREGATOR_TCP_TIMEOUT"));
//!
//! // edits validate and assemble into one atomic payload
//! form.set_text("LOG_AGGREGATOR_HOST", "other.example.org").unwrap();
//! form.validate_all().unwrap();
//! let payload = form.payload().unwrap();
//! assert_eq!(payload["LOG_AGGREGATOR_HOST"], json!("other.example.org"));
//! ```
//!
//! ## Driving a Real API
//!
//! ```rust,no_run
//! #[cfg(feature = "http")]
//! {
//!     use setforge::{FormController, HttpApi};
//!
//!     let api = HttpApi::builder("https://tower.example.org/api/v2")
//!         .token("oauth-token")
//!         .build()
//!         .unwrap();
//!
//!     let controller = FormController::new(api, "logging").unwrap();
//!     let mut form = controller.load().unwrap();
//!
//!     form.set_text("LOG_AGGREGATOR_HOST", "logs.internal").unwrap();
//!     let nav = controller.submit(&mut form).unwrap();
//!     assert_eq!(nav.route, "/settings/logging/details");
//! }
//! ```
//!
//! ## Revert and Undo
//!
//! Each field remembers its factory default and the value it loaded with.
//! While the current value differs from the default, the control reads
//! "Revert" and applies the default; once at the default (but loaded
//! different), it reads "Undo" and goes back to the loaded value. A field
//! that loaded at its default exposes nothing.

// schema first: `catalogue!` is textual-scoped within the crate
#[macro_use]
pub mod schema;

pub mod api;
pub mod category;
pub mod codec;
pub mod controller;
pub mod descriptor;
mod error;
pub mod events;
pub mod form;
pub mod revert;
mod sync;

#[cfg(feature = "http")]
pub mod http;

pub use api::{CategoryOptions, CategoryValues, ExecutionEnvironment, SettingsApi};
pub use category::{Category, VisibilityRule};
pub use codec::ENCRYPTED_PLACEHOLDER;
pub use controller::{DetailRow, DetailView, FormController, Navigation};
pub use descriptor::{
    DetailEntry, FieldDescriptor, InstanceBuckets, MergeOutcome, merge_permissive, merge_strict,
    split_instances,
};
pub use error::{Error, Result};
pub use events::EventManager;
pub use form::{FileUpload, FormField, FormState, ToggleOutcome};
pub use revert::{RevertAction, RevertState, RevertTracker};
pub use schema::{Choice, FieldMetadata, FieldType, OptionsCatalogue, choice};

#[cfg(feature = "http")]
pub use http::{HttpApi, HttpApiBuilder};
