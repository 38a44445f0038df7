//! CLI configuration.

use std::path::{Path, PathBuf};

use kc_admin_client::config::{DEFAULT_GRANT_TYPE, DEFAULT_TIMEOUT_SECS};
use kc_admin_client::ProviderConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Server URL (e.g., http://localhost:8080).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Realm to operate on.
    pub realm: Option<String>,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Service-account credentials.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Default server URL.
fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            realm: None,
            output_format: OutputFormat::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default file.
    pub fn load() -> crate::CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> crate::CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::CliError::Config(format!("failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to the default file.
    pub fn save(&self) -> crate::CliResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to `path`.
    pub fn save_to(&self, path: &Path) -> crate::CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::CliError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the configuration file path.
    pub fn config_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            crate::CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".keycloak").join("kc.toml"))
    }

    /// Sets a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> crate::CliResult<()> {
        let optional = |v: &str| (!v.is_empty() && v != "none").then(|| v.to_string());

        match key {
            "server_url" | "server" => self.server_url = value.to_string(),
            "realm" => self.realm = optional(value),
            "output_format" | "output" => self.output_format = value.parse()?,
            "client_id" => self.auth.client_id = value.to_string(),
            "client_secret" => self.auth.client_secret = optional(value),
            "username" => self.auth.username = optional(value),
            "password" => self.auth.password = optional(value),
            "grant_type" => self.auth.grant_type = value.to_string(),
            "timeout_secs" | "timeout" => {
                self.auth.timeout_secs = value.parse().map_err(|_| {
                    crate::CliError::InvalidArgument(format!("timeout must be a number: {value}"))
                })?;
            }
            _ => {
                return Err(crate::CliError::InvalidArgument(format!(
                    "Unknown configuration key: {}. Known keys: server_url, realm, output_format, \
                     client_id, client_secret, username, password, grant_type, timeout_secs",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Builds the provider configuration, applying command-line overrides.
    pub fn provider_config(
        &self,
        server: Option<&str>,
        realm: Option<&str>,
        client_secret: Option<&str>,
    ) -> crate::CliResult<ProviderConfig> {
        let realm = realm
            .map(str::to_string)
            .or_else(|| self.realm.clone())
            .ok_or_else(|| crate::CliError::InvalidArgument("realm is required".to_string()))?;

        let secret = client_secret
            .map(str::to_string)
            .or_else(|| self.auth.client_secret.clone())
            .unwrap_or_default();

        let mut config = ProviderConfig::new(
            server.unwrap_or(&self.server_url),
            realm,
            &self.auth.client_id,
            secret,
        )
        .with_grant_type(&self.auth.grant_type)
        .with_timeout_secs(self.auth.timeout_secs);

        if let Some(username) = &self.auth.username {
            config = config.with_username(username);
        }
        if let Some(password) = &self.auth.password {
            config = config.with_password(password);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
    /// Quiet (minimal output).
    Quiet,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "quiet" => Ok(Self::Quiet),
            _ => Err(crate::CliError::InvalidArgument(format!(
                "Unknown output format: {}. Supported: table, json, yaml, quiet",
                s
            ))),
        }
    }
}

/// Service-account authentication configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Client ID used to obtain the admin token.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Client secret.
    pub client_secret: Option<String>,
    /// Service-account username.
    pub username: Option<String>,
    /// Password for the `password` grant.
    pub password: Option<String>,
    /// OAuth grant type.
    #[serde(default = "default_grant_type")]
    pub grant_type: String,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_client_id() -> String {
    "admin-cli".to_string()
}

fn default_grant_type() -> String {
    DEFAULT_GRANT_TYPE.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
            client_secret: None,
            username: None,
            password: None,
            grant_type: default_grant_type(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "****"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("grant_type", &self.grant_type)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
