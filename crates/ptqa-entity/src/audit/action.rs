//! Audit action codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action codes written to the `action` column of `audit_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Successful login.
    Login,
    /// Explicit logout.
    Logout,
    /// Forced logout after inactivity.
    AutoLogout,
    /// Budget approved.
    ApproveBudget,
    /// Budget rejected.
    RejectBudget,
    /// Funds disbursed against an approved budget.
    RealisasiDana,
    /// User created.
    TambahUser,
    /// User profile edited.
    EditUser,
    /// User password changed.
    GantiPassword,
    /// User deleted.
    HapusUser,
    /// Transaction recorded.
    TambahTransaksi,
    /// Transaction edited.
    EditTransaksi,
    /// Transaction deleted.
    HapusTransaksi,
}

impl AuditAction {
    /// The code as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::AutoLogout => "AUTO_LOGOUT",
            Self::ApproveBudget => "APPROVE_BUDGET",
            Self::RejectBudget => "REJECT_BUDGET",
            Self::RealisasiDana => "REALISASI_DANA",
            Self::TambahUser => "TAMBAH_USER",
            Self::EditUser => "EDIT_USER",
            Self::GantiPassword => "GANTI_PASSWORD",
            Self::HapusUser => "HAPUS_USER",
            Self::TambahTransaksi => "TAMBAH_TRANSAKSI",
            Self::EditTransaksi => "EDIT_TRANSAKSI",
            Self::HapusTransaksi => "HAPUS_TRANSAKSI",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
