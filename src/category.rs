//! Settings category registry
//!
//! A category is the unit of fetch/update/revert against the configuration
//! API: a named group of keys identified by a slug. The registry also carries
//! the client-side form knowledge the API does not express - which fields
//! only show up under certain controller values, which toggles need a
//! confirmation before flipping, and how instanced categories (multiple LDAP
//! servers) split a shared key prefix.

use crate::error::{Error, Result};

/// One settings category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// API slug ("logging", "saml", ...)
    pub slug: &'static str,
    /// Display name
    pub name: &'static str,
    /// Instance key prefixes, most specific first. Keys matching one of these
    /// belong to that instance; the default bucket gets the rest.
    pub instance_prefixes: &'static [&'static str],
    /// Shared key prefix of the default bucket (instanced categories only)
    pub default_prefix: Option<&'static str>,
}

impl Category {
    /// Route of the category's read-only detail screen
    #[must_use]
    pub fn details_route(&self) -> String {
        format!("/settings/{}/details", self.slug)
    }

    /// Route of the category's edit screen
    #[must_use]
    pub fn edit_route(&self) -> String {
        format!("/settings/{}/edit", self.slug)
    }

    /// Whether this category splits into per-instance buckets
    #[must_use]
    pub fn is_instanced(&self) -> bool {
        !self.instance_prefixes.is_empty()
    }
}

/// Show/hide (and require) a field based on another field's value
#[derive(Debug, Clone, Copy)]
pub struct VisibilityRule {
    /// The dependent field
    pub field: &'static str,
    /// The field whose value controls visibility
    pub controller: &'static str,
    /// Controller values under which the dependent field is shown
    pub show_when: &'static [&'static str],
    /// Whether the dependent field becomes required while visible
    pub required_when_visible: bool,
}

// =============================================================================
// Registry
// =============================================================================

const CATEGORIES: &[Category] = &[
    Category {
        slug: "authentication",
        name: "Miscellaneous Authentication",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "logging",
        name: "Logging",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "jobs",
        name: "Jobs",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "ldap",
        name: "LDAP",
        instance_prefixes: &[
            "AUTH_LDAP_1_",
            "AUTH_LDAP_2_",
            "AUTH_LDAP_3_",
            "AUTH_LDAP_4_",
            "AUTH_LDAP_5_",
        ],
        default_prefix: Some("AUTH_LDAP_"),
    },
    Category {
        slug: "saml",
        name: "SAML",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "oidc",
        name: "Generic OIDC",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "radius",
        name: "RADIUS",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "tacacsplus",
        name: "TACACS+",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "system",
        name: "System",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "debug",
        name: "Debug",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "github",
        name: "GitHub OAuth2",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "azuread-oauth2",
        name: "Azure AD OAuth2",
        instance_prefixes: &[],
        default_prefix: None,
    },
    Category {
        slug: "google-oauth2",
        name: "Google OAuth2",
        instance_prefixes: &[],
        default_prefix: None,
    },
];

/// TCP timeout only applies to connection-oriented protocols; certificate
/// verification only to HTTPS.
const LOGGING_RULES: &[VisibilityRule] = &[
    VisibilityRule {
        field: "LOG_AGGREGATOR_TCP_TIMEOUT",
        controller: "LOG_AGGREGATOR_PROTOCOL",
        show_when: &["tcp", "https"],
        required_when_visible: true,
    },
    VisibilityRule {
        field: "LOG_AGGREGATOR_VERIFY_CERT",
        controller: "LOG_AGGREGATOR_PROTOCOL",
        show_when: &["https"],
        required_when_visible: false,
    },
];

/// Toggles that need an explicit confirmation before flipping
const AUTHENTICATION_DESTRUCTIVE: &[&str] = &["DISABLE_LOCAL_AUTH"];

/// All known categories
#[must_use]
pub fn all() -> &'static [Category] {
    CATEGORIES
}

/// Look up a category by slug
///
/// # Errors
///
/// Returns `Error::UnknownCategory` for an unregistered slug.
pub fn find(slug: &str) -> Result<&'static Category> {
    CATEGORIES
        .iter()
        .find(|c| c.slug == slug)
        .ok_or_else(|| Error::UnknownCategory(slug.to_string()))
}

/// Visibility rules for a category (empty for most)
#[must_use]
pub fn visibility_rules(slug: &str) -> &'static [VisibilityRule] {
    match slug {
        "logging" => LOGGING_RULES,
        _ => &[],
    }
}

/// Destructive toggles for a category (flipping one requires confirmation)
#[must_use]
pub fn destructive_toggles(slug: &str) -> &'static [&'static str] {
    match slug {
        "authentication" => AUTHENTICATION_DESTRUCTIVE,
        _ => &[],
    }
}

// =============================================================================
// Tests
// =============================================================================
