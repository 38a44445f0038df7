//! CLI error types.

use kc_admin_client::AdminError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Admin API error.
    #[error(transparent)]
    Admin(#[from] AdminError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
