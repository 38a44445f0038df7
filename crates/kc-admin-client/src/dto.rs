//! Request and response shapes for the user admin endpoints.
//!
//! [`UserRecord`] and [`UserRepresentation`] follow Keycloak's camelCase JSON
//! and keep any fields they do not model in a flattened map, so payloads pass
//! through unchanged. [`NormalizedUserView`] is the stable local shape returned
//! by [`get_user`](crate::UserDirectory::get_user).

use std::collections::BTreeMap;

pub use reqwest::header::HeaderMap;
pub use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User payload for create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Username (unique within the realm).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Whether the user is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Whether the email has been verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// Custom attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Vec<String>>,
    /// Credentials to set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<CredentialRepresentation>,
    /// Required actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_actions: Vec<String>,
    /// Provider-specific fields passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Creates a record for the given username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the enabled flag.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Appends a value to a custom attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Adds a password credential.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>, temporary: bool) -> Self {
        self.credentials.push(CredentialRepresentation {
            credential_type: "password".to_string(),
            value: password.into(),
            temporary,
        });
        self
    }

    /// Username used to find this user again: the username, else the email.
    #[must_use]
    pub fn lookup_username(&self) -> Option<&str> {
        non_blank(self.username.as_deref()).or_else(|| non_blank(self.email.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Credential attached to a user payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRepresentation {
    /// Credential type (e.g., "password").
    #[serde(rename = "type")]
    pub credential_type: String,
    /// Credential value.
    pub value: String,
    /// Whether the user must change it on next login.
    #[serde(default)]
    pub temporary: bool,
}

impl std::fmt::Debug for CredentialRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRepresentation")
            .field("credential_type", &self.credential_type)
            .field("value", &"[REDACTED]")
            .field("temporary", &self.temporary)
            .finish()
    }
}

/// User as returned by Keycloak lookup and list calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    /// Unique identifier.
    pub id: String,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Whether the user is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email has been verified.
    #[serde(default)]
    pub email_verified: bool,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Creation time in milliseconds since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
    /// Custom attributes; Keycloak omits the map when there are none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, Vec<String>>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Name/value pair in [`NormalizedUserView::user_attributes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl UserAttribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Stable local view of a user, decoupled from Keycloak's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedUserView {
    /// Remote identifier.
    pub username: String,
    /// Whether the user is enabled.
    pub enabled: bool,
    /// Creation time in milliseconds since epoch.
    pub user_create_date: Option<i64>,
    /// Last modification time; Keycloak only reports creation, so this mirrors it.
    pub user_last_modified_date: Option<i64>,
    /// Synthesized standard attributes followed by custom attributes.
    pub user_attributes: Vec<UserAttribute>,
}

impl NormalizedUserView {
    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.user_attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

impl From<UserRepresentation> for NormalizedUserView {
    fn from(user: UserRepresentation) -> Self {
        let custom = user.attributes.unwrap_or_default();
        let mut user_attributes = Vec::with_capacity(5 + custom.len());

        user_attributes.push(UserAttribute::new("sub", user.id.as_str()));
        user_attributes.push(UserAttribute::new(
            "emailVerified",
            user.email_verified.to_string(),
        ));
        user_attributes.push(UserAttribute::new(
            "given_name",
            user.first_name.unwrap_or_default(),
        ));
        user_attributes.push(UserAttribute::new(
            "family_name",
            user.last_name.unwrap_or_default(),
        ));
        user_attributes.push(UserAttribute::new("email", user.email.unwrap_or_default()));

        user_attributes.extend(
            custom
                .into_iter()
                .map(|(name, values)| UserAttribute::new(name, values.join(","))),
        );

        Self {
            username: user.id,
            enabled: user.enabled,
            user_create_date: user.created_timestamp,
            user_last_modified_date: user.created_timestamp,
            user_attributes,
        }
    }
}

/// Raw response of a call whose body is passed through untouched.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body (usually empty for deletes).
    pub body: String,
}

impl TransportResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }
}
