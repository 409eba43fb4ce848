//! Disbursement entity model.

use chrono::{DateTime, NaiveDate, Utc};
use ptqa_core::types::id::{BudgetId, DisbursementId};
use serde::{Deserialize, Serialize};

use crate::money::deserialize_amount;

/// A row of `fund_disbursements`: funds released against an approved budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disbursement {
    /// Unique disbursement identifier.
    pub id: DisbursementId,
    /// Budget the funds were drawn from.
    pub budget_id: BudgetId,
    /// Denormalised budget name.
    #[serde(default)]
    pub budget_name: Option<String>,
    /// Amount in rupiah.
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub amount: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Disbursement date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// When the row was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Data for recording a disbursement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDisbursement {
    /// Budget to draw from; must be approved.
    pub budget_id: BudgetId,
    /// Amount in rupiah; must be positive.
    pub amount: i64,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Disbursement date.
    pub date: NaiveDate,
}
