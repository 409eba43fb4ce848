//! Notification aggregation configuration.

use serde::{Deserialize, Serialize};

/// Thresholds and windows of the notification rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Seconds between aggregation passes.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Minimum amount (rupiah) of an expense worth alerting on.
    #[serde(default = "default_large_expense_threshold")]
    pub large_expense_threshold: i64,
    /// Trailing window for large expenses, in days.
    #[serde(default = "default_window_days")]
    pub large_expense_window_days: i64,
    /// Maximum large-expense events per pass.
    #[serde(default = "default_large_expense_limit")]
    pub large_expense_limit: usize,
    /// Bills older than this many months count as overdue.
    #[serde(default = "default_overdue_after_months")]
    pub overdue_after_months: u32,
    /// Trailing window for budget decisions, in days.
    #[serde(default = "default_window_days")]
    pub decision_window_days: i64,
    /// Maximum budget decision events per pass.
    #[serde(default = "default_decision_limit")]
    pub decision_limit: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            large_expense_threshold: default_large_expense_threshold(),
            large_expense_window_days: default_window_days(),
            large_expense_limit: default_large_expense_limit(),
            overdue_after_months: default_overdue_after_months(),
            decision_window_days: default_window_days(),
            decision_limit: default_decision_limit(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}

fn default_large_expense_threshold() -> i64 {
    200_000
}

fn default_window_days() -> i64 {
    7
}

fn default_large_expense_limit() -> usize {
    10
}

fn default_overdue_after_months() -> u32 {
    2
}

fn default_decision_limit() -> usize {
    5
}
