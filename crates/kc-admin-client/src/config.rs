//! Provider configuration.
//!
//! Settings can be built directly, parsed from TOML, or read from
//! `KEYCLOAK_*` environment variables. A configuration is validated once when
//! the [`AdminProvider`](crate::AdminProvider) is constructed and never
//! changes afterwards.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, AdminResult};

/// Default grant type for the service account.
pub const DEFAULT_GRANT_TYPE: &str = "client_credentials";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keycloak connection and service-account settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Server base URL (e.g., `https://sso.example.com`).
    pub keycloak_base_url: String,
    /// Realm whose users are managed.
    pub keycloak_realm_name: String,
    /// Service-account username sent with the token request.
    #[serde(default)]
    pub keycloak_username: String,
    /// OAuth client ID.
    pub keycloak_client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub keycloak_client_secret: String,
    /// OAuth grant type.
    #[serde(default = "default_grant_type")]
    pub keycloak_grant_type: String,
    /// Password, only sent when set (for the `password` grant).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keycloak_password: Option<String>,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_grant_type() -> String {
    DEFAULT_GRANT_TYPE.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ProviderConfig {
    /// Creates a configuration with the client-credentials grant and default timeout.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            keycloak_base_url: base_url.into(),
            keycloak_realm_name: realm.into(),
            keycloak_username: String::new(),
            keycloak_client_id: client_id.into(),
            keycloak_client_secret: client_secret.into(),
            keycloak_grant_type: default_grant_type(),
            keycloak_password: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the service-account username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.keycloak_username = username.into();
        self
    }

    /// Sets the grant type.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.keycloak_grant_type = grant_type.into();
        self
    }

    /// Sets the password sent with the token request.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.keycloak_password = Some(password.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Parses a configuration from TOML.
    pub fn from_toml_str(content: &str) -> AdminResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AdminError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from `KEYCLOAK_*` environment variables.
    ///
    /// `KEYCLOAK_BASE_URL`, `KEYCLOAK_REALM_NAME` and `KEYCLOAK_CLIENT_ID` are
    /// required; the rest fall back to their defaults.
    pub fn from_env() -> AdminResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AdminResult<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| AdminError::Config(format!("{key} is not set")))
        };

        let request_timeout_secs = match lookup("KEYCLOAK_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                AdminError::Config(format!("KEYCLOAK_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            keycloak_base_url: required("KEYCLOAK_BASE_URL")?,
            keycloak_realm_name: required("KEYCLOAK_REALM_NAME")?,
            keycloak_username: lookup("KEYCLOAK_USERNAME").unwrap_or_default(),
            keycloak_client_id: required("KEYCLOAK_CLIENT_ID")?,
            keycloak_client_secret: lookup("KEYCLOAK_CLIENT_SECRET").unwrap_or_default(),
            keycloak_grant_type: lookup("KEYCLOAK_GRANT_TYPE").unwrap_or_else(default_grant_type),
            keycloak_password: lookup("KEYCLOAK_PASSWORD"),
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AdminResult<()> {
        let base = self.keycloak_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(AdminError::Config(format!(
                "keycloak_base_url must start with http:// or https://: {base}"
            )));
        }
        if self.keycloak_realm_name.trim().is_empty() {
            return Err(AdminError::Config("keycloak_realm_name is required".to_string()));
        }
        if self.keycloak_client_id.trim().is_empty() {
            return Err(AdminError::Config("keycloak_client_id is required".to_string()));
        }
        if self.keycloak_grant_type.trim().is_empty() {
            return Err(AdminError::Config("keycloak_grant_type is required".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AdminError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.keycloak_base_url.trim().trim_end_matches('/')
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Token endpoint for the configured realm.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            urlencoding::encode(&self.keycloak_realm_name)
        )
    }

    /// Users collection endpoint for the configured realm.
    #[must_use]
    pub fn users_url(&self) -> String {
        format!(
            "{}/admin/realms/{}/users",
            self.base_url(),
            urlencoding::encode(&self.keycloak_realm_name)
        )
    }

    /// Endpoint for a single user.
    #[must_use]
    pub fn user_url(&self, user_id: &str) -> String {
        format!("{}/{}", self.users_url(), urlencoding::encode(user_id))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("keycloak_base_url", &self.keycloak_base_url)
            .field("keycloak_realm_name", &self.keycloak_realm_name)
            .field("keycloak_username", &self.keycloak_username)
            .field("keycloak_client_id", &self.keycloak_client_id)
            .field("keycloak_client_secret", &"[REDACTED]")
            .field("keycloak_grant_type", &self.keycloak_grant_type)
            .field(
                "keycloak_password",
                &self.keycloak_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
