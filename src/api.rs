//! Settings API trait seam
//!
//! Everything the engine needs from the platform is behind [`SettingsApi`],
//! so screens can be driven by the real HTTP client or an in-memory fake in
//! tests. The engine never talks to the network anywhere else.

use crate::error::Result;
use crate::schema::OptionsCatalogue;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw value payload of one settings category
pub type CategoryValues = BTreeMap<String, Value>;

/// Method-scoped metadata catalogues from the options endpoint
///
/// `GET` describes every readable field, `PUT` the writable subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryOptions {
    /// Metadata of readable fields
    #[serde(rename = "GET", default)]
    pub get: OptionsCatalogue,
    /// Metadata of writable fields
    #[serde(rename = "PUT", default)]
    pub put: OptionsCatalogue,
}

/// Summary of an execution environment, used only to resolve a display name
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionEnvironment {
    /// Numeric id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Container image reference
    #[serde(default)]
    pub image: Option<String>,
}

/// Client interface to the configuration API
///
/// All calls are blocking request/response; the engine issues at most one at
/// a time per form, so there is no concurrent mutation of form state.
pub trait SettingsApi {
    /// Read the current key/value payload of a category
    fn read_category(&self, slug: &str) -> Result<CategoryValues>;

    /// Read the method-scoped metadata catalogues of a category
    fn read_options(&self, slug: &str) -> Result<CategoryOptions>;

    /// Atomically update a category with the given payload
    fn update_all(&self, slug: &str, payload: &CategoryValues) -> Result<()>;

    /// Reset every value of a category to its factory default
    fn revert_category(&self, slug: &str) -> Result<()>;

    /// Resolve an execution environment by id (display-name lookup)
    fn read_execution_environment(&self, id: u64) -> Result<ExecutionEnvironment>;
}
