//! Common test utilities for setforge integration tests
//!
//! Provides an in-memory [`SettingsApi`] fake with call recording, plus
//! category fixtures matching what the platform's endpoints return.

#![allow(dead_code)]

use serde_json::{Value, json};
use setforge::{
    CategoryOptions, CategoryValues, Error, ExecutionEnvironment, FieldMetadata, Result,
    SettingsApi, catalogue, choice,
};
use std::collections::HashMap;
use std::sync::Mutex;

// =============================================================================
// Mock API
// =============================================================================

/// What the mock should do on a given call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    ReadCategory,
    ReadOptions,
    UpdateAll,
    RevertCategory,
}

/// In-memory settings API with call recording
pub struct MockApi {
    options: HashMap<String, CategoryOptions>,
    values: Mutex<HashMap<String, CategoryValues>>,
    environments: Vec<ExecutionEnvironment>,
    failures: Mutex<Vec<Failure>>,

    /// Payloads passed to update_all, in call order
    pub updates: Mutex<Vec<(String, CategoryValues)>>,
    /// Slugs passed to revert_category, in call order
    pub reverts: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        // RUST_LOG=debug surfaces the engine's merge/submit logging
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            options: HashMap::new(),
            values: Mutex::new(HashMap::new()),
            environments: Vec::new(),
            failures: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            reverts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_category(
        mut self,
        slug: &str,
        options: CategoryOptions,
        values: CategoryValues,
    ) -> Self {
        self.options.insert(slug.to_string(), options);
        self.values.lock().unwrap().insert(slug.to_string(), values);
        self
    }

    pub fn with_environment(mut self, env: ExecutionEnvironment) -> Self {
        self.environments.push(env);
        self
    }

    /// Make the next matching call fail with an HTTP-shaped error
    pub fn fail_next(&self, failure: Failure) {
        self.failures.lock().unwrap().push(failure);
    }

    fn take_failure(&self, failure: Failure) -> bool {
        let mut failures = self.failures.lock().unwrap();
        if let Some(pos) = failures.iter().position(|f| *f == failure) {
            failures.remove(pos);
            return true;
        }
        false
    }
}

impl SettingsApi for MockApi {
    fn read_category(&self, slug: &str) -> Result<CategoryValues> {
        if self.take_failure(Failure::ReadCategory) {
            return Err(Error::Fetch {
                slug: slug.to_string(),
                reason: "HTTP 500".to_string(),
            });
        }
        self.values
            .lock()
            .unwrap()
            .get(slug)
            .cloned()
            .ok_or_else(|| Error::Fetch {
                slug: slug.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }

    fn read_options(&self, slug: &str) -> Result<CategoryOptions> {
        if self.take_failure(Failure::ReadOptions) {
            return Err(Error::Fetch {
                slug: slug.to_string(),
                reason: "HTTP 500".to_string(),
            });
        }
        self.options.get(slug).cloned().ok_or_else(|| Error::Fetch {
            slug: slug.to_string(),
            reason: "HTTP 404".to_string(),
        })
    }

    fn update_all(&self, slug: &str, payload: &CategoryValues) -> Result<()> {
        if self.take_failure(Failure::UpdateAll) {
            return Err(Error::Submit {
                slug: slug.to_string(),
                reason: "HTTP 400: invalid payload".to_string(),
            });
        }
        self.updates
            .lock()
            .unwrap()
            .push((slug.to_string(), payload.clone()));
        if let Some(stored) = self.values.lock().unwrap().get_mut(slug) {
            for (key, value) in payload {
                stored.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    fn revert_category(&self, slug: &str) -> Result<()> {
        if self.take_failure(Failure::RevertCategory) {
            return Err(Error::Revert {
                slug: slug.to_string(),
                reason: "HTTP 500".to_string(),
            });
        }
        self.reverts.lock().unwrap().push(slug.to_string());
        Ok(())
    }

    fn read_execution_environment(&self, id: u64) -> Result<ExecutionEnvironment> {
        self.environments
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| Error::Lookup {
                resource: "execution environment".to_string(),
                id: id.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

// =============================================================================
// Category Fixtures
// =============================================================================

/// Logging category as the options endpoint describes it
pub fn logging_options() -> CategoryOptions {
    let fields = catalogue! {
        "LOG_AGGREGATOR_HOST" => FieldMetadata::string("Logging Aggregator", ""),
        "LOG_AGGREGATOR_PORT" => FieldMetadata::integer("Logging Aggregator Port", 514)
            .min(1.0).max(65535.0),
        "LOG_AGGREGATOR_PROTOCOL" => FieldMetadata::choice("Logging Aggregator Protocol", "https", vec![
            choice("https", "HTTPS/HTTP"),
            choice("tcp", "TCP"),
            choice("udp", "UDP"),
        ]),
        "LOG_AGGREGATOR_TCP_TIMEOUT" => FieldMetadata::integer("TCP Connection Timeout", 5)
            .min(1.0).unit("seconds"),
        "LOG_AGGREGATOR_VERIFY_CERT" => FieldMetadata::boolean("Enable/disable HTTPS certificate verification", true),
        "LOG_AGGREGATOR_ENABLED" => FieldMetadata::boolean("Enable External Logging", false),
    };
    CategoryOptions {
        get: fields.clone(),
        put: fields,
    }
}

pub fn logging_values() -> CategoryValues {
    [
        ("LOG_AGGREGATOR_HOST".to_string(), json!("logs.example.org")),
        ("LOG_AGGREGATOR_PORT".to_string(), json!(6514)),
        ("LOG_AGGREGATOR_PROTOCOL".to_string(), json!("udp")),
        ("LOG_AGGREGATOR_TCP_TIMEOUT".to_string(), json!(5)),
        ("LOG_AGGREGATOR_VERIFY_CERT".to_string(), json!(true)),
        ("LOG_AGGREGATOR_ENABLED".to_string(), json!(false)),
    ]
    .into()
}

/// Jobs category, including a structured list field and an execution
/// environment reference
pub fn jobs_options() -> CategoryOptions {
    let fields = catalogue! {
        "AD_HOC_COMMANDS" => FieldMetadata::list("Ansible Modules Allowed for Ad Hoc Jobs", json!(["command", "shell"])),
        "AWX_TASK_ENV" => FieldMetadata::nested_object("Extra Environment Variables", json!({})),
        "DEFAULT_EXECUTION_ENVIRONMENT" => FieldMetadata::integer("Global Default Execution Environment", 0),
        "MAX_FORKS" => FieldMetadata::integer("Maximum number of forks per job", 200).min(0.0),
    };
    CategoryOptions {
        get: fields.clone(),
        put: fields,
    }
}

pub fn jobs_values() -> CategoryValues {
    [
        ("AD_HOC_COMMANDS".to_string(), json!(["command", "shell", "ping"])),
        ("AWX_TASK_ENV".to_string(), json!({"HTTP_PROXY": "proxy.local"})),
        ("DEFAULT_EXECUTION_ENVIRONMENT".to_string(), json!(1)),
        ("MAX_FORKS".to_string(), json!(200)),
    ]
    .into()
}

/// Authentication category with its destructive toggle and an encrypted
/// secret, plus a hidden bookkeeping key
pub fn authentication_options() -> CategoryOptions {
    let fields = catalogue! {
        "DISABLE_LOCAL_AUTH" => FieldMetadata::boolean("Disable the built-in authentication system", false),
        "SESSION_COOKIE_AGE" => FieldMetadata::integer("Idle Time Force Log Out", 1800)
            .min(60.0).unit("seconds"),
        "SOCIAL_AUTH_GITHUB_SECRET" => FieldMetadata::string("GitHub OAuth2 Secret", "").encrypted(),
        "INSTALL_UUID" => FieldMetadata::string("Unique identifier for an installation", "").hidden(),
    };
    CategoryOptions {
        get: fields.clone(),
        put: fields,
    }
}

pub fn authentication_values() -> CategoryValues {
    [
        ("DISABLE_LOCAL_AUTH".to_string(), json!(false)),
        ("SESSION_COOKIE_AGE".to_string(), json!(1800)),
        ("SOCIAL_AUTH_GITHUB_SECRET".to_string(), json!("$encrypted$")),
        ("INSTALL_UUID".to_string(), json!("00000000-aaaa-bbbb-cccc-000000000000")),
    ]
    .into()
}

/// Value helper
pub fn value_map(pairs: &[(&str, Value)]) -> CategoryValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
