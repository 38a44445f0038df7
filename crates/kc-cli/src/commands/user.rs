//! User management commands.

use chrono::DateTime;
use kc_admin_client::{UserDirectory, UserRecord, UserRepresentation};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::UserCommand;
use crate::config::OutputFormat;
use crate::output::{confirm, output, output_single, success, warning};

/// User representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct UserRow {
    /// User ID.
    pub id: String,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// First name.
    #[tabled(rename = "First Name")]
    pub first_name: String,
    /// Last name.
    #[tabled(rename = "Last Name")]
    pub last_name: String,
    /// Whether the user is enabled.
    pub enabled: bool,
    /// Creation time (UTC).
    pub created: String,
}

impl From<&UserRepresentation> for UserRow {
    fn from(user: &UserRepresentation) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone().unwrap_or_default(),
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            enabled: user.enabled,
            created: user.created_timestamp.map(format_millis).unwrap_or_default(),
        }
    }
}

/// Formats milliseconds since epoch as a UTC timestamp.
fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Runs a user command.
pub async fn run_user(
    cmd: UserCommand,
    directory: &dyn UserDirectory,
    format: OutputFormat,
) -> crate::CliResult<()> {
    match cmd {
        UserCommand::Create {
            username,
            email,
            first_name,
            last_name,
            enabled,
            attributes,
            password,
            temporary_password,
        } => {
            if username.is_none() && email.is_none() {
                return Err(crate::CliError::InvalidArgument(
                    "either --username or --email is required".to_string(),
                ));
            }

            let mut record = UserRecord {
                username,
                email,
                first_name,
                last_name,
                enabled: Some(enabled),
                ..UserRecord::default()
            };
            for (key, value) in parse_attributes(&attributes)? {
                record = record.with_attribute(key, value);
            }
            if let Some(p) = password {
                record = record.with_password(p, temporary_password);
            }

            create_user(directory, &record, format).await
        }
        UserCommand::Get { id } => {
            let view = directory.get_user(&id).await?;
            output_single(&view, format)
        }
        UserCommand::List { query } => {
            let users = directory.list_users(query.as_deref()).await?;
            let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
            output(&rows, format, |row| row.id.as_str())
        }
        UserCommand::Update {
            id,
            email,
            first_name,
            last_name,
            enabled,
            attributes,
        } => {
            let mut record = UserRecord {
                email,
                first_name,
                last_name,
                enabled,
                ..UserRecord::default()
            };
            for (key, value) in parse_attributes(&attributes)? {
                record = record.with_attribute(key, value);
            }
            if record == UserRecord::default() {
                return Err(crate::CliError::InvalidArgument(
                    "nothing to update".to_string(),
                ));
            }

            directory.update_user(&record, &id).await?;
            if !matches!(format, OutputFormat::Quiet) {
                success(&format!("User '{}' updated successfully", id));
            }
            Ok(())
        }
        UserCommand::Delete { id, force } => {
            if !force && !confirm(&format!("Are you sure you want to delete user '{}'?", id))? {
                warning("Operation cancelled");
                return Ok(());
            }

            let response = directory.delete_user(&id).await?;
            tracing::debug!(status = %response.status, "Delete completed");
            if !matches!(format, OutputFormat::Quiet) {
                success(&format!("User '{}' deleted successfully", id));
            }
            Ok(())
        }
    }
}

/// Creates (or converges) a user and prints its ID.
async fn create_user(
    directory: &dyn UserDirectory,
    record: &UserRecord,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let id = directory.create_user(record).await?;

    match format {
        OutputFormat::Table => success(&format!("User '{}' is ready", id)),
        OutputFormat::Json => println!("{}", serde_json::json!({ "id": id })),
        OutputFormat::Yaml => println!("id: {id}"),
        OutputFormat::Quiet => println!("{id}"),
    }
    Ok(())
}

/// Parses `key=value` attribute arguments.
pub fn parse_attributes(raw: &[String]) -> crate::CliResult<Vec<(String, String)>> {
    raw.iter()
        .map(|item| {
            let (key, value) = item.split_once('=').ok_or_else(|| {
                crate::CliError::InvalidArgument(format!(
                    "attribute must be key=value: {}",
                    item
                ))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(crate::CliError::InvalidArgument(format!(
                    "attribute key is empty: {}",
                    item
                )));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
