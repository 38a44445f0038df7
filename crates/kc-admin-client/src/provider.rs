//! Keycloak user admin provider.
//!
//! Every public operation runs the same sequence: fetch a fresh service-account
//! token, call one admin endpoint, then reshape or pass through the response.
//! Failures are wrapped in the operation's own [`AdminError`] variant.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::dto::{NormalizedUserView, TransportResponse, UserRecord, UserRepresentation};
use crate::error::{AdminError, AdminResult, RemoteError};
use crate::token::{fetch_token, AccessToken};

/// Page-size ceiling appended to every listing request.
pub const LIST_MAX_RESULTS: u32 = 10_000;

/// User management operations against an identity provider.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Creates a user and returns its identifier.
    ///
    /// When the username is already taken, the existing user is updated with
    /// `record` instead and its identifier is returned.
    async fn create_user(&self, record: &UserRecord) -> AdminResult<String>;

    /// Fetches a user and maps it into a [`NormalizedUserView`].
    async fn get_user(&self, user_id: &str) -> AdminResult<NormalizedUserView>;

    /// Lists users, forwarding `query` (e.g. `?search=jane`) with the
    /// [`LIST_MAX_RESULTS`] cap appended.
    async fn list_users(&self, query: Option<&str>) -> AdminResult<Vec<UserRepresentation>>;

    /// Deletes a user and returns the raw response.
    async fn delete_user(&self, user_id: &str) -> AdminResult<TransportResponse>;

    /// Replaces a user's representation with `record`.
    async fn update_user(&self, record: &UserRecord, user_id: &str) -> AdminResult<()>;
}

/// Admin client for one Keycloak realm.
#[derive(Debug, Clone)]
pub struct AdminProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl AdminProvider {
    /// Creates a provider from a validated configuration.
    pub fn new(config: ProviderConfig) -> AdminResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AdminError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Returns the provider configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Fetches users whose username matches exactly.
    pub async fn find_users_by_username(
        &self,
        username: &str,
    ) -> AdminResult<Vec<UserRepresentation>> {
        debug!(realm = %self.config.keycloak_realm_name, username, "Looking up users by username");
        let token = self.authorized_token().await?;
        self.lookup_username(&token, username)
            .await
            .map_err(|source| AdminError::UserLookup {
                user_id: username.to_string(),
                source,
            })
    }

    /// Requests a fresh service-account token.
    async fn access_token(&self) -> AdminResult<AccessToken> {
        fetch_token(&self.client, &self.config)
            .await
            .map_err(|source| AdminError::TokenAcquisition { source })
    }

    /// Requests a token and rejects an empty one.
    async fn authorized_token(&self) -> AdminResult<AccessToken> {
        let token = self.access_token().await?;
        if token.is_empty() {
            return Err(AdminError::Uninitialized);
        }
        Ok(token)
    }

    /// Attaches the bearer token and JSON content type.
    fn authorized(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        builder
            .bearer_auth(token.as_str())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn lookup_username(
        &self,
        token: &AccessToken,
        username: &str,
    ) -> Result<Vec<UserRepresentation>, RemoteError> {
        let url = format!(
            "{}?username={}&exact=true",
            self.config.users_url(),
            urlencoding::encode(username)
        );
        let response = self.authorized(self.client.get(url), token).send().await?;
        read_json(check_status(response).await?).await
    }

    async fn fetch_user(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> Result<UserRepresentation, RemoteError> {
        let response = self
            .authorized(self.client.get(self.config.user_url(user_id)), token)
            .send()
            .await?;
        read_json(check_status(response).await?).await
    }

    async fn fetch_page(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> Result<Vec<UserRepresentation>, RemoteError> {
        let url = format!("{}{}", self.config.users_url(), query);
        let response = self.authorized(self.client.get(url), token).send().await?;
        read_json(check_status(response).await?).await
    }

    async fn send_delete(
        &self,
        token: &AccessToken,
        user_id: &str,
    ) -> Result<TransportResponse, RemoteError> {
        let response = self
            .authorized(self.client.delete(self.config.user_url(user_id)), token)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(TransportResponse::read(response).await?)
    }

    async fn post_user(&self, token: &AccessToken, record: &UserRecord) -> Result<(), RemoteError> {
        let response = self
            .authorized(self.client.post(self.config.users_url()), token)
            .json(record)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn put_user(
        &self,
        token: &AccessToken,
        record: &UserRecord,
        user_id: &str,
    ) -> Result<(), RemoteError> {
        let response = self
            .authorized(self.client.put(self.config.user_url(user_id)), token)
            .json(record)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Returns the identifier of the first exact username match.
    async fn resolve_id(
        &self,
        token: &AccessToken,
        username: &str,
        email: &str,
    ) -> AdminResult<String> {
        let users = self
            .lookup_username(token, username)
            .await
            .map_err(|source| creation_error(email, source))?;

        users
            .into_iter()
            .next()
            .map(|u| u.id)
            .ok_or_else(|| AdminError::UserNotFoundAfterCreate {
                username: username.to_string(),
            })
    }
}

#[async_trait]
impl UserDirectory for AdminProvider {
    async fn create_user(&self, record: &UserRecord) -> AdminResult<String> {
        let email = record.email.as_deref().unwrap_or_default();
        let username = record.lookup_username().ok_or_else(|| {
            AdminError::Validation("user record needs a username or an email".to_string())
        })?;
        debug!(realm = %self.config.keycloak_realm_name, username, email, "Creating user");

        let token = self.authorized_token().await?;

        match self.post_user(&token, record).await {
            Ok(()) => self.resolve_id(&token, username, email).await,
            Err(e) if e.is_user_exists() => {
                debug!(username, "User already exists, updating it instead");
                let user_id = self.resolve_id(&token, username, email).await?;
                self.put_user(&token, record, &user_id)
                    .await
                    .map_err(|source| creation_error(email, source))?;
                Ok(user_id)
            }
            Err(source) => Err(creation_error(email, source)),
        }
    }

    async fn get_user(&self, user_id: &str) -> AdminResult<NormalizedUserView> {
        debug!(realm = %self.config.keycloak_realm_name, user_id, "Fetching user");
        let token = self.authorized_token().await?;

        self.fetch_user(&token, user_id)
            .await
            .map(NormalizedUserView::from)
            .map_err(|source| AdminError::UserLookup {
                user_id: user_id.to_string(),
                source,
            })
    }

    async fn list_users(&self, query: Option<&str>) -> AdminResult<Vec<UserRepresentation>> {
        let query = list_query(query);
        debug!(realm = %self.config.keycloak_realm_name, query = %query, "Listing users");
        let token = self.authorized_token().await?;

        self.fetch_page(&token, &query)
            .await
            .map_err(|source| AdminError::UserList { source })
    }

    async fn delete_user(&self, user_id: &str) -> AdminResult<TransportResponse> {
        debug!(realm = %self.config.keycloak_realm_name, user_id, "Deleting user");
        let token = self.authorized_token().await?;

        self.send_delete(&token, user_id)
            .await
            .map_err(|source| AdminError::UserDeletion {
                user_id: user_id.to_string(),
                source,
            })
    }

    async fn update_user(&self, record: &UserRecord, user_id: &str) -> AdminResult<()> {
        debug!(realm = %self.config.keycloak_realm_name, user_id, "Updating user");
        let token = self.authorized_token().await?;

        self.put_user(&token, record, user_id)
            .await
            .map_err(|source| AdminError::UserUpdate {
                user_id: user_id.to_string(),
                source,
            })
    }
}

fn creation_error(email: &str, source: RemoteError) -> AdminError {
    AdminError::UserCreation {
        email: email.to_string(),
        source,
    }
}

/// Builds the listing query string with the result cap appended.
pub(crate) fn list_query(query: Option<&str>) -> String {
    match query.map(str::trim).filter(|q| !q.is_empty() && *q != "?") {
        Some(q) if q.starts_with('?') => format!("{q}&max={LIST_MAX_RESULTS}"),
        Some(q) => format!("?{q}&max={LIST_MAX_RESULTS}"),
        None => format!("?max={LIST_MAX_RESULTS}"),
    }
}

/// Passes a success response through, otherwise turns it into [`RemoteError::Status`].
pub(crate) async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Decodes a JSON body, keeping transport and decode failures apart.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Extracts Keycloak's error message from a response body.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["errorMessage", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(key)?.as_str().map(str::to_string))
        });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}
