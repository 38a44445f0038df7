//! Command implementations.

pub mod config;
pub mod user;

pub use config::run_config;
pub use user::run_user;

use kc_admin_client::AdminProvider;

use crate::CliConfig;

/// Connection overrides taken from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides<'a> {
    /// Server URL.
    pub server: Option<&'a str>,
    /// Realm.
    pub realm: Option<&'a str>,
    /// Client secret.
    pub client_secret: Option<&'a str>,
}

/// Builds an admin provider from the configuration and overrides.
pub fn build_provider(config: &CliConfig, overrides: Overrides<'_>) -> crate::CliResult<AdminProvider> {
    let provider_config =
        config.provider_config(overrides.server, overrides.realm, overrides.client_secret)?;
    tracing::debug!(
        server = %provider_config.base_url(),
        realm = %provider_config.keycloak_realm_name,
        "Using Keycloak admin API"
    );
    Ok(AdminProvider::new(provider_config)?)
}
