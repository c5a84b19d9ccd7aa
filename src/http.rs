//! Blocking HTTP client for the configuration API
//!
//! [`HttpApi`] speaks the platform's JSON settings endpoints: category values
//! at `settings/{slug}/`, field metadata via `OPTIONS` on the same route, and
//! execution environments for display-name lookups. Enabled by the `http`
//! feature; everything else in the crate works against the [`SettingsApi`]
//! trait alone.

use crate::api::{CategoryOptions, CategoryValues, ExecutionEnvironment, SettingsApi};
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `OPTIONS` responses wrap the method catalogues in an `actions` object
#[derive(Debug, Default, Deserialize)]
struct OptionsEnvelope {
    #[serde(default)]
    actions: CategoryOptions,
}

/// Builder for [`HttpApi`]
pub struct HttpApiBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpApiBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bearer token sent with every request
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Per-request timeout (default 30s)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the base URL is not an http(s) URL.
    pub fn build(self) -> Result<HttpApi> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "Base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();

        Ok(HttpApi {
            agent,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            token: self.token,
        })
    }
}

/// Client for the platform's settings endpoints
#[derive(Debug)]
pub struct HttpApi {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    /// Start building a client against an API root
    /// (e.g. `https://tower.example.org/api/v2`)
    pub fn builder(base_url: impl Into<String>) -> HttpApiBuilder {
        HttpApiBuilder::new(base_url)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.agent.request(method, &url);
        if let Some(ref token) = self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request.set("Accept", "application/json")
    }

    fn describe(error: ureq::Error) -> String {
        match error {
            ureq::Error::Status(code, response) => {
                let detail = response.into_string().unwrap_or_default();
                if detail.is_empty() {
                    format!("HTTP {code}")
                } else {
                    format!("HTTP {code}: {detail}")
                }
            }
            ureq::Error::Transport(transport) => transport.to_string(),
        }
    }
}

impl SettingsApi for HttpApi {
    fn read_category(&self, slug: &str) -> Result<CategoryValues> {
        debug!("GET settings/{slug}/");
        let response = self
            .request("GET", &format!("settings/{slug}/"))
            .call()
            .map_err(|e| Error::fetch(slug, Self::describe(e)))?;
        response
            .into_json()
            .map_err(|e| Error::fetch(slug, e.to_string()))
    }

    fn read_options(&self, slug: &str) -> Result<CategoryOptions> {
        debug!("OPTIONS settings/{slug}/");
        let response = self
            .request("OPTIONS", &format!("settings/{slug}/"))
            .call()
            .map_err(|e| Error::fetch(slug, Self::describe(e)))?;
        let envelope: OptionsEnvelope = response
            .into_json()
            .map_err(|e| Error::fetch(slug, e.to_string()))?;
        Ok(envelope.actions)
    }

    fn update_all(&self, slug: &str, payload: &CategoryValues) -> Result<()> {
        debug!("PUT settings/{slug}/ ({} keys)", payload.len());
        self.request("PUT", &format!("settings/{slug}/"))
            .send_json(payload)
            .map_err(|e| Error::submit(slug, Self::describe(e)))?;
        Ok(())
    }

    fn revert_category(&self, slug: &str) -> Result<()> {
        debug!("DELETE settings/{slug}/");
        self.request("DELETE", &format!("settings/{slug}/"))
            .call()
            .map_err(|e| Error::revert(slug, Self::describe(e)))?;
        Ok(())
    }

    fn read_execution_environment(&self, id: u64) -> Result<ExecutionEnvironment> {
        debug!("GET execution_environments/{id}/");
        let response = self
            .request("GET", &format!("execution_environments/{id}/"))
            .call()
            .map_err(|e| Error::Lookup {
                resource: "execution environment".to_string(),
                id: id.to_string(),
                reason: Self::describe(e),
            })?;
        response.into_json().map_err(|e| Error::Lookup {
            resource: "execution environment".to_string(),
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
