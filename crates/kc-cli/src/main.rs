//! # Keycloak CLI
//!
//! Command-line administration of Keycloak users.

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use kc_cli::{
    cli::{Cli, Command},
    commands::{build_provider, run_config, run_user, Overrides},
    config::CliConfig,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "kc_cli=debug,kc_admin_client=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {}", e));
            std::process::exit(1);
        }
    };

    let output = cli.output.unwrap_or(config.output_format);

    let result = match cli.command {
        Command::User(cmd) => {
            let overrides = Overrides {
                server: cli.server.as_deref(),
                realm: cli.realm.as_deref(),
                client_secret: cli.client_secret.as_deref(),
            };
            match build_provider(&config, overrides) {
                Ok(provider) => run_user(cmd, &provider, output).await,
                Err(e) => Err(e),
            }
        }
        Command::Config(cmd) => run_config(cmd, &mut config),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
