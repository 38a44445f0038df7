//! Error types for the admin client.
//!
//! Each public operation wraps whatever went wrong on the wire in its own
//! [`AdminError`] variant, keeping the original [`RemoteError`] as the source.

use thiserror::Error;

/// Message Keycloak returns when a create collides with an existing username.
const USER_EXISTS_MESSAGE: &str = "user exists with same username";

/// Result type alias for admin client operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// Failure talking to the identity provider.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("remote returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it carried none.
        message: String,
    },

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body was valid JSON but lacked a required field.
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),
}

impl RemoteError {
    /// Returns the HTTP status for [`RemoteError::Status`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether the provider rejected a create because the username is taken.
    #[must_use]
    pub fn is_user_exists(&self) -> bool {
        match self {
            Self::Status { message, .. } => {
                message.to_ascii_lowercase().contains(USER_EXISTS_MESSAGE)
            }
            _ => false,
        }
    }
}

/// Admin client error type.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid provider configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-supplied input was rejected before any request was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// The service-account token could not be obtained.
    #[error("failed to acquire access token: {source}")]
    TokenAcquisition {
        /// Underlying failure.
        #[source]
        source: RemoteError,
    },

    /// The token endpoint handed back an empty token.
    #[error("admin client is not initialized: no access token")]
    Uninitialized,

    /// Creating (or converging an existing) user failed.
    #[error("failed to create user {email}: {source}")]
    UserCreation {
        /// Email of the user being created, for diagnostics.
        email: String,
        /// Underlying failure.
        #[source]
        source: RemoteError,
    },

    /// The username lookup after a create returned no match.
    #[error("user {username} not found after create")]
    UserNotFoundAfterCreate {
        /// Username that was looked up.
        username: String,
    },

    /// Fetching or mapping a user failed.
    #[error("failed to get user {user_id}: {source}")]
    UserLookup {
        /// Identifier that was requested.
        user_id: String,
        /// Underlying failure.
        #[source]
        source: RemoteError,
    },

    /// Listing users failed.
    #[error("failed to list users: {source}")]
    UserList {
        /// Underlying failure.
        #[source]
        source: RemoteError,
    },

    /// Deleting a user failed.
    #[error("failed to delete user {user_id}: {source}")]
    UserDeletion {
        /// Identifier that was targeted.
        user_id: String,
        /// Underlying failure.
        #[source]
        source: RemoteError,
    },

    /// Updating a user failed.
    #[error("failed to update user {user_id}: {source}")]
    UserUpdate {
        /// Identifier that was targeted.
        user_id: String,
        /// Underlying failure.
        #[source]
        source: RemoteError,
    },
}

impl AdminError {
    /// Returns the remote cause, if this error carries one.
    #[must_use]
    pub const fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::TokenAcquisition { source }
            | Self::UserCreation { source, .. }
            | Self::UserLookup { source, .. }
            | Self::UserList { source }
            | Self::UserDeletion { source, .. }
            | Self::UserUpdate { source, .. } => Some(source),
            Self::Config(_)
            | Self::Validation(_)
            | Self::Uninitialized
            | Self::UserNotFoundAfterCreate { .. } => None,
        }
    }

    /// Returns the HTTP status of the remote cause, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.remote().and_then(RemoteError::status)
    }
}
