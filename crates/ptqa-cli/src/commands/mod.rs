//! CLI command definitions and dispatch.

pub mod budget;
pub mod dashboard;
pub mod notification;
pub mod session;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use ptqa_core::config::AppConfig;
use ptqa_core::error::AppError;
use ptqa_service::{Application, LogNavigator};

use crate::output::OutputFormat;

/// PTQA pesantren finance dashboard
#[derive(Debug, Parser)]
#[command(name = "ptqa", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Configuration environment overlay
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login(session::LoginArgs),
    /// End the persisted session
    Logout,
    /// Show the logged-in principal and its capabilities
    Whoami,
    /// Notification feed
    Notifications(notification::NotificationArgs),
    /// Budget approval workflow
    Budget(budget::BudgetArgs),
    /// Finance summary
    Dashboard,
    /// User administration
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let app = open_app(&self.config, &self.env).await?;

        match &self.command {
            Commands::Login(args) => session::login(&app, args, self.format).await,
            Commands::Logout => session::logout(&app).await,
            Commands::Whoami => session::whoami(&app, self.format),
            Commands::Notifications(args) => notification::execute(&app, args, self.format).await,
            Commands::Budget(args) => budget::execute(&app, args, self.format).await,
            Commands::Dashboard => dashboard::execute(&app, self.format).await,
            Commands::User(args) => user::execute(&app, args, self.format).await,
        }
    }
}

/// Build the application and restore the persisted session. Every
/// invocation counts as activity on a live session.
pub async fn open_app(config_dir: &str, env: &str) -> Result<Application, AppError> {
    let config = AppConfig::load_from(config_dir, env)?;
    let app = Application::connect(config, Arc::new(LogNavigator)).await?;

    let state = app.session.restore().await;
    if state.is_authenticated() {
        app.session.record_activity();
        app.session.flush_activity().await?;
    }
    debug!(authenticated = state.is_authenticated(), "Session restored");

    Ok(app)
}
