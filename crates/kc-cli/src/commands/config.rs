//! Configuration management commands.

use crate::cli::ConfigCommand;
use crate::config::OutputFormat;
use crate::output::{info, prompt_secret, success, warning};
use crate::CliConfig;

/// Runs a config command.
pub fn run_config(cmd: ConfigCommand, config: &mut CliConfig) -> crate::CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            let shown = if matches!(key.as_str(), "client_secret" | "password") {
                "****"
            } else {
                value.as_str()
            };
            success(&format!("Set {} = {}", key, shown));
            Ok(())
        }
        ConfigCommand::Init => init_config(config),
    }
}

/// Shows the current configuration.
fn show_config(config: &CliConfig) -> crate::CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info(&format!("Configuration file: {}", config_path.display()));
    println!();
    print!("{}", describe(config));
    Ok(())
}

/// Renders the configuration with the secret masked.
fn describe(config: &CliConfig) -> String {
    let mut lines = vec![format!("server_url: {}", config.server_url)];
    if let Some(realm) = &config.realm {
        lines.push(format!("realm: {}", realm));
    }
    lines.push(format!("output_format: {:?}", config.output_format));
    lines.push(format!("client_id: {}", config.auth.client_id));
    lines.push(format!(
        "client_secret: {}",
        if config.auth.client_secret.is_some() { "****" } else { "(not set)" }
    ));
    if let Some(username) = &config.auth.username {
        lines.push(format!("username: {}", username));
    }
    if config.auth.password.is_some() {
        lines.push("password: ****".to_string());
    }
    lines.push(format!("grant_type: {}", config.auth.grant_type));
    lines.push(format!("timeout_secs: {}", config.auth.timeout_secs));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Reads one line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> crate::CliResult<String> {
    print!("{prompt}");
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Parses the typed output format, keeping `current` on empty or invalid input.
fn chosen_format(input: &str, current: OutputFormat) -> OutputFormat {
    if input.is_empty() {
        return current;
    }
    match input.parse() {
        Ok(format) => format,
        Err(e) => {
            warning(&format!("{}; keeping {:?}", e, current));
            current
        }
    }
}

/// Initializes configuration interactively.
fn init_config(config: &mut CliConfig) -> crate::CliResult<()> {
    let config_path = CliConfig::config_path()?;

    info("Initializing Keycloak CLI configuration...");
    println!();

    let input = prompt_line(&format!("Server URL [{}]: ", config.server_url))?;
    if !input.is_empty() {
        config.server_url = input;
    }

    let current_realm = config.realm.as_deref().unwrap_or("(none)");
    let input = prompt_line(&format!("Realm [{}]: ", current_realm))?;
    if !input.is_empty() && input != "(none)" {
        config.realm = Some(input);
    }

    let input = prompt_line(&format!("Client ID [{}]: ", config.auth.client_id))?;
    if !input.is_empty() {
        config.auth.client_id = input;
    }

    let secret = prompt_secret("Client secret (leave empty to keep): ")?;
    if !secret.is_empty() {
        config.auth.client_secret = Some(secret);
    }

    let input = prompt_line(&format!(
        "Output format (table/json/yaml/quiet) [{:?}]: ",
        config.output_format
    ))?;
    config.output_format = chosen_format(&input, config.output_format);

    config.save()?;

    println!();
    success(&format!("Configuration saved to: {}", config_path.display()));
    Ok(())
}
