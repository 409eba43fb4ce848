//! Student bill entity model.

use chrono::NaiveDate;
use ptqa_core::types::id::{BillId, StudentId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::deserialize_amount;

/// Payment status of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillStatus {
    /// Outstanding.
    #[serde(rename = "Belum Lunas")]
    BelumLunas,
    /// Paid.
    #[serde(rename = "Lunas")]
    Lunas,
}

impl BillStatus {
    /// The value stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelumLunas => "Belum Lunas",
            Self::Lunas => "Lunas",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of `student_bills`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentBill {
    /// Unique bill identifier.
    pub id: BillId,
    /// Billed student.
    pub student_id: StudentId,
    /// Denormalised student name.
    #[serde(default)]
    pub student_name: Option<String>,
    /// Payment category label.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Amount in rupiah.
    #[serde(deserialize_with = "deserialize_amount", default)]
    pub amount: i64,
    /// Billing period as `YYYY-MM`.
    pub month: String,
    /// Payment status.
    pub status: BillStatus,
    /// Payment date, once paid.
    #[serde(default)]
    pub paid_at: Option<NaiveDate>,
}

impl StudentBill {
    /// Student name, or the generic label when the row lacks one.
    pub fn student_label(&self) -> &str {
        self.student_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Santri")
    }
}
