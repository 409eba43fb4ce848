//! User administration CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ptqa_core::error::AppError;
use ptqa_service::Application;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Name
    name: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(app: &Application, args: &UserArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        UserCommand::List => {
            let ctx = app.context()?;
            let users = app.users.list_users(&ctx).await?;

            let rows: Vec<UserRow> = users
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    username: u.username.clone(),
                    name: u.name.clone(),
                    role: u.role.to_string(),
                    status: u.status.to_string(),
                    created_at: u
                        .created_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                })
                .collect();

            output::print_list(&rows, format);
        }
    }

    Ok(())
}
