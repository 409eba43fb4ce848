//! Notification feed CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ptqa_core::error::AppError;
use ptqa_entity::notification::NotificationEvent;
use ptqa_service::{Application, FeedFilter};

use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List the feed
    List {
        /// all, unread, or a kind (expense, overdue, approval, success, rejected)
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Mark one notification read and show where it leads
    Read {
        /// Notification id
        id: String,
    },
    /// Mark every notification in the feed read
    ReadAll,
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Read marker
    #[tabled(rename = "")]
    unread: String,
    /// Event id
    id: String,
    /// Kind
    kind: String,
    /// Title
    title: String,
    /// Message
    message: String,
    /// Date
    date: String,
}

impl From<&NotificationEvent> for NotificationRow {
    fn from(e: &NotificationEvent) -> Self {
        Self {
            unread: if e.read { "" } else { "●" }.to_string(),
            id: e.id.clone(),
            kind: e.kind.to_string(),
            title: e.title.clone(),
            message: e.message.clone(),
            date: e.date.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute notification commands
pub async fn execute(
    app: &Application,
    args: &NotificationArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let principal = app.session.require_principal()?;
    app.feed.refresh(&principal).await;

    match &args.command {
        NotificationCommand::List { filter } => {
            let filter: FeedFilter = filter.parse()?;
            let events = app.feed.filtered(filter).await;
            output::print_list(&events_as_rows(&events), format);
            if format == OutputFormat::Table {
                println!("{} unread", app.feed.unread_count().await);
            }
        }
        NotificationCommand::Read { id } => {
            let event = app.feed.open(id).await?;
            output::print_success(&format!("{} → {}", event.title, event.link));
        }
        NotificationCommand::ReadAll => {
            app.feed.mark_all_read().await?;
            output::print_success("All notifications marked read");
        }
    }

    Ok(())
}

fn events_as_rows(events: &[NotificationEvent]) -> Vec<NotificationRow> {
    events.iter().map(NotificationRow::from).collect()
}
