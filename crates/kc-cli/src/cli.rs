//! CLI argument parsing.

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// Keycloak user administration tool.
#[derive(Debug, Parser)]
#[command(name = "kc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server URL (overrides config).
    #[arg(short, long, env = "KC_SERVER_URL")]
    pub server: Option<String>,

    /// Realm (overrides config).
    #[arg(short, long, env = "KC_REALM")]
    pub realm: Option<String>,

    /// Service-account client secret (overrides config).
    #[arg(long, env = "KC_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// User management commands.
    #[command(subcommand)]
    User(UserCommand),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// User commands.
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user, or update it if the username is taken.
    Create {
        /// Username (defaults to the email).
        #[arg(long)]
        username: Option<String>,

        /// Email address.
        #[arg(long)]
        email: Option<String>,

        /// First name.
        #[arg(long)]
        first_name: Option<String>,

        /// Last name.
        #[arg(long)]
        last_name: Option<String>,

        /// Enable the user.
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        enabled: bool,

        /// Custom attribute as key=value (repeatable).
        #[arg(long = "attribute", value_name = "KEY=VALUE")]
        attributes: Vec<String>,

        /// Initial password.
        #[arg(long)]
        password: Option<String>,

        /// Require password change on first login.
        #[arg(long, requires = "password")]
        temporary_password: bool,
    },

    /// Get user details.
    Get {
        /// User ID.
        id: String,
    },

    /// List users.
    List {
        /// Raw query forwarded to Keycloak (e.g. "?search=jane").
        #[arg(long)]
        query: Option<String>,
    },

    /// Update a user.
    Update {
        /// User ID.
        id: String,

        /// New email.
        #[arg(long)]
        email: Option<String>,

        /// New first name.
        #[arg(long)]
        first_name: Option<String>,

        /// New last name.
        #[arg(long)]
        last_name: Option<String>,

        /// Enable/disable the user.
        #[arg(long)]
        enabled: Option<bool>,

        /// Custom attribute as key=value (repeatable).
        #[arg(long = "attribute", value_name = "KEY=VALUE")]
        attributes: Vec<String>,
    },

    /// Delete a user.
    Delete {
        /// User ID.
        id: String,

        /// Skip confirmation.
        #[arg(long)]
        force: bool,
    },
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Initialize configuration interactively.
    Init,
}
