//! # kc-admin-client
//!
//! Service-account client for the Keycloak user admin REST API.
//!
//! This crate provides:
//! - Access token acquisition against a realm's token endpoint
//! - User create, get, list, update and delete calls
//! - Translation of Keycloak user representations into a stable local view
//!
//! Every public operation fetches its own token; nothing is cached between
//! calls.
//!
//! ## Example
//!
//! ```no_run
//! use kc_admin_client::{AdminProvider, ProviderConfig, UserDirectory, UserRecord};
//!
//! # async fn run() -> kc_admin_client::AdminResult<()> {
//! let config = ProviderConfig::from_env()?;
//! let provider = AdminProvider::new(config)?;
//!
//! let record = UserRecord::new("jane@example.com").with_email("jane@example.com");
//! let id = provider.create_user(&record).await?;
//! let view = provider.get_user(&id).await?;
//! assert!(view.enabled);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod dto;
pub mod error;
pub mod provider;
pub mod token;

pub use config::ProviderConfig;
pub use dto::{NormalizedUserView, TransportResponse, UserAttribute, UserRecord, UserRepresentation};
pub use error::{AdminError, AdminResult, RemoteError};
pub use provider::{AdminProvider, UserDirectory, LIST_MAX_RESULTS};
pub use token::AccessToken;
