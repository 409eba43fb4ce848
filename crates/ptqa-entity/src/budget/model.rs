//! Budget entity model.

use chrono::{DateTime, Utc};
use ptqa_core::types::id::BudgetId;
use serde::{Deserialize, Serialize};

use super::status::BudgetStatus;
use crate::money::deserialize_amount;

/// A row of `fund_budgets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique budget identifier.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Requested amount in rupiah.
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub amount: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Period the budget covers, as entered.
    #[serde(default)]
    pub period: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: BudgetStatus,
    /// Display name of the deciding principal.
    #[serde(default)]
    pub approved_by: Option<String>,
    /// When the decision was made.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    /// When the row was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Data for a new budget proposal. New budgets always start pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBudget {
    /// Budget name.
    pub name: String,
    /// Requested amount in rupiah.
    pub amount: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Period the budget covers.
    #[serde(default)]
    pub period: Option<String>,
}
