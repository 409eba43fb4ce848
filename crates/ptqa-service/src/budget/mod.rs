//! Budget approval workflow and disbursement tabs.

pub mod service;
pub mod tabs;

pub use service::{BudgetFilter, BudgetReportLine, BudgetService};
pub use tabs::{DisbursementTab, active_tab, allowed_tabs, default_tab};
