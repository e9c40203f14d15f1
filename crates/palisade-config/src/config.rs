//! Main configuration types.
//!
//! This module provides the top-level [`GatewayConfig`] struct and its
//! sections. The compiled-in defaults carry the gateway's stock policy
//! table, public-path allowlist, and origin allowlist; deployments
//! override them through a file or environment variables, never at
//! runtime.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Complete Palisade gateway configuration.
///
/// This is the root configuration type containing all sections. Use
/// [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables. Once loaded it is immutable; share it behind
/// an `Arc` into every pipeline component.
///
/// # Example
///
/// ```
/// use palisade_config::GatewayConfig;
///
/// let config = GatewayConfig::default();
/// assert!(config.auth.public_paths.iter().any(|p| p == "/api/auth/"));
/// assert!(config.policy.default_allow);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Credential verification configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Path-prefix authorization policy.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Cross-origin allowlist shared by enforcement and diagnostics.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl GatewayConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The signing secret is empty or not valid base64
    /// - A policy entry has an empty prefix or an empty role set
    /// - An origin entry is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.signing_secret.is_empty() {
            return Err(ConfigError::invalid_value(
                "auth.signing_secret",
                "signing secret must be set",
            ));
        }
        if STANDARD.decode(&self.auth.signing_secret).is_err() {
            return Err(ConfigError::invalid_value(
                "auth.signing_secret",
                "signing secret must be standard base64",
            ));
        }

        for entry in &self.policy.entries {
            if entry.prefix.is_empty() {
                return Err(ConfigError::invalid_value(
                    "policy.entries",
                    "policy entry prefix must not be empty",
                ));
            }
            if entry.roles.is_empty() {
                return Err(ConfigError::invalid_value(
                    "policy.entries",
                    format!("policy entry '{}' has an empty role set", entry.prefix),
                ));
            }
        }

        if self.cors.allowed_origins.iter().any(String::is_empty) {
            return Err(ConfigError::invalid_value(
                "cors.allowed_origins",
                "origin entries must not be empty",
            ));
        }

        Ok(())
    }
}

/// Credential verification section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Standard-base64-encoded HMAC-SHA256 signing secret.
    ///
    /// Empty by default: deployments must supply it explicitly (file or
    /// `PREFIX__AUTH__SIGNING_SECRET`); validation rejects an empty value.
    #[serde(default)]
    pub signing_secret: String,

    /// Path fragments that bypass authentication entirely, matched by
    /// substring against the unmodified request path.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            public_paths: default_public_paths(),
        }
    }
}

fn default_public_paths() -> Vec<String> {
    vec!["/api/auth/".to_string(), "/actuator".to_string()]
}

/// Path-prefix authorization policy section.
///
/// Entries are evaluated in order; the first prefix the request path
/// starts with determines the allowed role set. Unmatched paths fall
/// through to the default decision. The stock default is allow: coarse
/// gateway-level policy only, with fine-grained authorization delegated
/// to the destination service. That delegation is a documented trust
/// boundary, not an oversight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Ordered (path prefix, allowed roles) entries.
    #[serde(default = "default_policy_entries")]
    pub entries: Vec<PolicyEntry>,

    /// Decision for paths no entry matches.
    #[serde(default = "default_true")]
    pub default_allow: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            entries: default_policy_entries(),
            default_allow: true,
        }
    }
}

/// One authorization rule keyed by a literal path prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyEntry {
    /// Literal path prefix, e.g. `/api/cart/`.
    pub prefix: String,

    /// Roles permitted under this prefix.
    pub roles: Vec<String>,
}

impl PolicyEntry {
    /// Convenience constructor for compiled-in tables and tests.
    #[must_use]
    pub fn new(prefix: impl Into<String>, roles: &[&str]) -> Self {
        Self {
            prefix: prefix.into(),
            roles: roles.iter().map(ToString::to_string).collect(),
        }
    }
}

fn default_policy_entries() -> Vec<PolicyEntry> {
    let customer_or_admin = &["CUSTOMER", "ADMIN"];
    vec![
        PolicyEntry::new("/api/cart/", customer_or_admin),
        PolicyEntry::new("/api/orders/", customer_or_admin),
        PolicyEntry::new("/api/payments/", customer_or_admin),
        PolicyEntry::new("/api/shipping/", customer_or_admin),
    ]
}

fn default_true() -> bool {
    true
}

/// Cross-origin allowlist section.
///
/// A single list feeds both CORS enforcement and the diagnostic origin
/// evaluator so the two can never drift apart. Matching is exact after
/// one trailing slash is stripped from each side; wildcard patterns are
/// deliberately not supported here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins, e.g. `http://localhost:5173`.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

/// Builder for [`GatewayConfig`].
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    /// Sets the auth section.
    #[must_use]
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Sets the signing secret (standard base64).
    #[must_use]
    pub fn signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.auth.signing_secret = secret.into();
        self
    }

    /// Sets the policy section.
    #[must_use]
    pub fn policy(mut self, policy: PolicyConfig) -> Self {
        self.config.policy = policy;
        self
    }

    /// Sets the cors section.
    #[must_use]
    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.config.cors = cors;
        self
    }

    /// Builds the configuration without validating it.
    #[must_use]
    pub fn build(self) -> GatewayConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "c2VjcmV0LXNpZ25pbmcta2V5LWZvci1wYWxpc2FkZS10ZXN0cw==";

    #[test]
    fn test_defaults_cover_stock_tables() {
        let config = GatewayConfig::default();
        assert_eq!(config.auth.public_paths, vec!["/api/auth/", "/actuator"]);
        assert_eq!(config.policy.entries.len(), 4);
        assert!(config.policy.default_allow);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);

        let cart = &config.policy.entries[0];
        assert_eq!(cart.prefix, "/api/cart/");
        assert_eq!(cart.roles, vec!["CUSTOMER", "ADMIN"]);
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base64_secret() {
        let config = GatewayConfig::builder().signing_secret("***").build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let config = GatewayConfig::builder().signing_secret(SECRET).build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_nameable_from_crate_root() {
        let builder: crate::GatewayConfigBuilder = GatewayConfig::builder();
        assert!(builder.build().validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_role_set() {
        let mut config = GatewayConfig::builder().signing_secret(SECRET).build();
        config.policy.entries.push(PolicyEntry {
            prefix: "/api/admin/".to_string(),
            roles: vec![],
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = GatewayConfig::builder().signing_secret(SECRET).build();
        let rendered = toml::to_string(&config).expect("serialize");
        let parsed: GatewayConfig = toml::from_str(&rendered).expect("parse");
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<GatewayConfig, _> = toml::from_str("[auth]\nsecrett = \"typo\"\n");
        assert!(result.is_err());
    }
}
