//! Transaction entity model.

use chrono::{DateTime, NaiveDate, Utc};
use ptqa_core::types::id::TransactionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::deserialize_amount;

/// Direction of a cash-book entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Income.
    Pemasukan,
    /// Expense.
    Pengeluaran,
}

impl TransactionType {
    /// The value stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pemasukan => "pemasukan",
            Self::Pengeluaran => "pengeluaran",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ptqa_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pemasukan" => Ok(Self::Pemasukan),
            "pengeluaran" => Ok(Self::Pengeluaran),
            _ => Err(ptqa_core::AppError::validation(format!(
                "Invalid transaction type: '{s}'. Expected pemasukan or pengeluaran"
            ))),
        }
    }
}

/// A row of `transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub id: TransactionId,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount in rupiah.
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub amount: i64,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Booking date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// When the row was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// The booking date, falling back to the creation date.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.date.or_else(|| self.created_at.map(|t| t.date_naive()))
    }

    /// Category label or a placeholder.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Lainnya")
    }
}

/// Data for recording or replacing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransaction {
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount in rupiah; must be positive.
    pub amount: i64,
    /// Category label.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Booking date.
    pub date: NaiveDate,
}
