//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles known to the dashboard.
///
/// The legacy role string `"user"` is an alias for [`UserRole::Pengasuh`]
/// and is normalised at the boundary; it is never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator.
    Admin,
    /// Treasurer: records transactions, plans budgets and disbursements.
    Bendahara,
    /// Supervisor: approves or rejects budgets.
    #[serde(alias = "user")]
    Pengasuh,
}

impl UserRole {
    /// Every role, in privilege order.
    pub const ALL: [UserRole; 3] = [Self::Admin, Self::Bendahara, Self::Pengasuh];

    /// Return the canonical role string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Bendahara => "bendahara",
            Self::Pengasuh => "pengasuh",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Bendahara => "Bendahara",
            Self::Pengasuh => "Pengasuh",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ptqa_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "bendahara" => Ok(Self::Bendahara),
            "pengasuh" | "user" => Ok(Self::Pengasuh),
            _ => Err(ptqa_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, bendahara, pengasuh"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_legacy_alias() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("BENDAHARA".parse::<UserRole>().unwrap(), UserRole::Bendahara);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::Pengasuh);
        assert!("viewer".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_normalises_alias() {
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::Pengasuh);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"pengasuh\"");
    }
}
