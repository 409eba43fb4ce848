//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a derived notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A large recent expense.
    Expense,
    /// A student with long-overdue bills.
    Overdue,
    /// Budgets awaiting approval.
    Approval,
    /// A budget was approved.
    Success,
    /// A budget was rejected.
    Rejected,
}

impl NotificationKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Overdue => "overdue",
            Self::Approval => "approval",
            Self::Success => "success",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ptqa_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "overdue" => Ok(Self::Overdue),
            "approval" => Ok(Self::Approval),
            "success" => Ok(Self::Success),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ptqa_core::AppError::validation(format!(
                "Invalid notification kind: '{s}'. Expected one of: expense, overdue, approval, success, rejected"
            ))),
        }
    }
}
