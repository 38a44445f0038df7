//! Output formatting utilities.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Outputs rows in the specified format.
///
/// `quiet` prints one identifier per line.
pub fn output<T, F>(data: &[T], format: OutputFormat, quiet: F) -> crate::CliResult<()>
where
    T: Tabled + serde::Serialize,
    F: Fn(&T) -> &str,
{
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                info("No results found.");
            } else {
                let table = Table::new(data).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Quiet => {
            for item in data {
                println!("{}", quiet(item));
            }
        }
    }
    Ok(())
}

/// Outputs a single item.
pub fn output_single<T: serde::Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(item)?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Prompts for confirmation.
pub fn confirm(message: &str) -> crate::CliResult<bool> {
    print!("{message} [y/N]: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

/// Prompts for secret input (hidden).
pub fn prompt_secret(prompt: &str) -> crate::CliResult<String> {
    rpassword::prompt_password(prompt).map_err(crate::CliError::Io)
}

#[cfg(test)]
mod tests {
    use kc_admin_client::{NormalizedUserView, UserAttribute};

    fn view() -> NormalizedUserView {
        NormalizedUserView {
            username: "u1".to_string(),
            enabled: true,
            user_create_date: Some(1_700_000_000_000),
            user_last_modified_date: Some(1_700_000_000_000),
            user_attributes: vec![
                UserAttribute::new("emailVerified", "true"),
                UserAttribute::new("given_name", ""),
                UserAttribute::new("note", "- a: b # c"),
            ],
        }
    }

    #[test]
    fn yaml_keeps_string_scalars_distinct() {
        let yaml = serde_yaml::to_string(&view()).unwrap();
        assert!(yaml.contains("Enabled: true\n"));
        assert!(yaml.contains("Value: 'true'"));
        assert!(yaml.contains("Value: ''"));
    }

    #[test]
    fn yaml_round_trips_awkward_values() {
        let yaml = serde_yaml::to_string(&view()).unwrap();
        let parsed: NormalizedUserView = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, view());
        assert_eq!(parsed.attribute("note"), Some("- a: b # c"));
        assert_eq!(parsed.attribute("given_name"), Some(""));
    }
}
