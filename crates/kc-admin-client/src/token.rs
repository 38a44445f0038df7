//! Service-account token acquisition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::RemoteError;
use crate::provider::check_status;

/// Bearer token for admin API calls.
///
/// Lives for a single operation and is never cached.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the token is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Form body sent to the token endpoint.
#[derive(Serialize)]
pub(crate) struct TokenRequest<'a> {
    username: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

impl<'a> TokenRequest<'a> {
    pub(crate) fn from_config(config: &'a ProviderConfig) -> Self {
        Self {
            username: &config.keycloak_username,
            client_id: &config.keycloak_client_id,
            client_secret: &config.keycloak_client_secret,
            grant_type: &config.keycloak_grant_type,
            password: config.keycloak_password.as_deref(),
        }
    }
}

/// Subset of the token endpoint response we rely on.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Requests a fresh access token from the realm's token endpoint.
pub(crate) async fn fetch_token(
    client: &reqwest::Client,
    config: &ProviderConfig,
) -> Result<AccessToken, RemoteError> {
    let response = client
        .post(config.token_url())
        .form(&TokenRequest::from_config(config))
        .send()
        .await?;
    let response = check_status(response).await?;

    let body = response.text().await?;
    let token: TokenResponse = serde_json::from_str(&body)?;
    token
        .access_token
        .map(AccessToken::new)
        .ok_or(RemoteError::MissingField("access_token"))
}
