//! Student entity model.

use ptqa_core::types::id::StudentId;
use serde::{Deserialize, Serialize};

/// A row of `students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: StudentId,
    /// Student registration number.
    #[serde(default)]
    pub nis: Option<String>,
    /// Full name.
    pub name: String,
    /// Class.
    #[serde(default)]
    pub kelas: Option<String>,
    /// Intake year.
    #[serde(default)]
    pub angkatan: Option<String>,
    /// Guardian name.
    #[serde(default)]
    pub parent_name: Option<String>,
    /// Guardian phone number, as entered.
    #[serde(default)]
    pub phone: Option<String>,
    /// Enrolment status, `"Aktif"` for current students.
    #[serde(default)]
    pub status: Option<String>,
}

impl Student {
    /// Whether the student is currently enrolled.
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case("aktif"))
    }

    /// Name used to address the guardian.
    pub fn guardian_name(&self) -> &str {
        self.parent_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}
