//! Budget status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a budget. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Approved; disbursements may be recorded.
    Approved,
    /// Rejected.
    Rejected,
}

impl BudgetStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether no further transition is allowed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Indonesian label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Menunggu",
            Self::Approved => "Disetujui",
            Self::Rejected => "Ditolak",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision on a pending budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetDecision {
    /// Approve.
    Approved,
    /// Reject.
    Rejected,
}

impl BudgetDecision {
    /// The status this decision moves a budget to.
    pub fn status(&self) -> BudgetStatus {
        match self {
            Self::Approved => BudgetStatus::Approved,
            Self::Rejected => BudgetStatus::Rejected,
        }
    }

    /// Past-tense verb used in audit details.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Approved => "disetujui",
            Self::Rejected => "ditolak",
        }
    }
}

impl FromStr for BudgetDecision {
    type Err = ptqa_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" | "approve" => Ok(Self::Approved),
            "rejected" | "reject" => Ok(Self::Rejected),
            _ => Err(ptqa_core::AppError::validation(format!(
                "Invalid budget decision: '{s}'. Expected approved or rejected"
            ))),
        }
    }
}
