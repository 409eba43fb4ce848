//! Budget workflow CLI commands.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use ptqa_core::error::AppError;
use ptqa_core::types::id::BudgetId;
use ptqa_entity::budget::Budget;
use ptqa_entity::money::format_rupiah;
use ptqa_service::budget::{BudgetFilter, DisbursementTab, active_tab, allowed_tabs};
use ptqa_service::Application;

use crate::output::{self, OutputFormat};

/// Arguments for budget commands
#[derive(Debug, Args)]
pub struct BudgetArgs {
    /// Budget subcommand
    #[command(subcommand)]
    pub command: BudgetCommand,
}

/// Budget subcommands
#[derive(Debug, Subcommand)]
pub enum BudgetCommand {
    /// Show the disbursement tabs available to the current role
    Tabs {
        /// Requested tab key (anggaran, persetujuan, realisasi, laporan)
        #[arg(long)]
        tab: Option<String>,
    },
    /// List budgets
    List {
        /// Only budgets awaiting a decision
        #[arg(long)]
        pending: bool,
        /// Search name and description
        #[arg(short, long)]
        search: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Approve a pending budget
    Approve {
        /// Budget ID
        id: String,
    },
    /// Reject a pending budget
    Reject {
        /// Budget ID
        id: String,
    },
    /// Approved budgets with disbursed and remaining amounts
    Report,
}

/// Tab display row
#[derive(Debug, Serialize, Tabled)]
struct TabRow {
    /// Tab key
    key: String,
    /// Label
    label: String,
    /// Active marker
    active: String,
}

/// Budget display row
#[derive(Debug, Serialize, Tabled)]
struct BudgetRow {
    /// Budget ID
    id: String,
    /// Name
    name: String,
    /// Amount
    amount: String,
    /// Status
    status: String,
    /// Decided by
    approved_by: String,
}

impl From<&Budget> for BudgetRow {
    fn from(b: &Budget) -> Self {
        Self {
            id: b.id.to_string(),
            name: b.name.clone(),
            amount: format_rupiah(b.amount),
            status: b.status.label().to_string(),
            approved_by: b.approved_by.clone().unwrap_or_default(),
        }
    }
}

/// Report display row
#[derive(Debug, Serialize, Tabled)]
struct ReportRow {
    /// Name
    name: String,
    /// Budget amount
    amount: String,
    /// Disbursed so far
    disbursed: String,
    /// Remaining
    remaining: String,
}

/// Execute budget commands
pub async fn execute(app: &Application, args: &BudgetArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        BudgetCommand::Tabs { tab } => {
            let role = app.session.principal().map(|p| p.role);
            let requested = tab.as_deref().map(str::parse::<DisbursementTab>).transpose()?;
            let active = active_tab(role, requested);
            let rows: Vec<TabRow> = allowed_tabs(role)
                .into_iter()
                .map(|t| TabRow {
                    key: t.key().to_string(),
                    label: t.label().to_string(),
                    active: if t == active { "●" } else { "" }.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        BudgetCommand::List {
            pending,
            search,
            start,
            end,
        } => {
            app.session.require_principal()?;
            let filter = BudgetFilter {
                search: search.clone(),
                start: *start,
                end: *end,
            };
            let budgets = if *pending {
                app.budgets.pending_approvals(&filter).await?
            } else {
                app.budgets.list(&filter).await?
            };
            let rows: Vec<BudgetRow> = budgets.iter().map(BudgetRow::from).collect();
            output::print_list(&rows, format);
        }
        BudgetCommand::Approve { id } => {
            let ctx = app.context()?;
            let budget = app.budgets.approve(&ctx, &BudgetId::from(id.as_str())).await?;
            output::print_success(&format!("Anggaran \"{}\" disetujui", budget.name));
        }
        BudgetCommand::Reject { id } => {
            let ctx = app.context()?;
            let budget = app.budgets.reject(&ctx, &BudgetId::from(id.as_str())).await?;
            output::print_success(&format!("Anggaran \"{}\" ditolak", budget.name));
        }
        BudgetCommand::Report => {
            app.session.require_principal()?;
            let rows: Vec<ReportRow> = app
                .budgets
                .report()
                .await?
                .iter()
                .map(|line| ReportRow {
                    name: line.budget.name.clone(),
                    amount: format_rupiah(line.budget.amount),
                    disbursed: format_rupiah(line.disbursed),
                    remaining: format_rupiah(line.remaining),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
