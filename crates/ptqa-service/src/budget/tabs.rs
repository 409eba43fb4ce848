//! Role-dependent tabs of the disbursement workflow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ptqa_core::error::AppError;
use ptqa_entity::user::UserRole;

/// A tab of the disbursement screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementTab {
    /// Proposing budgets.
    BudgetPlanning,
    /// Deciding on pending budgets.
    Approval,
    /// Recording disbursements against approved budgets.
    Disbursement,
    /// Budget and disbursement report.
    Report,
}

impl DisbursementTab {
    /// Every tab in display order.
    pub const ALL: [DisbursementTab; 4] = [
        Self::BudgetPlanning,
        Self::Approval,
        Self::Disbursement,
        Self::Report,
    ];

    /// Key used in the `tab` query parameter.
    pub fn key(&self) -> &'static str {
        match self {
            Self::BudgetPlanning => "anggaran",
            Self::Approval => "persetujuan",
            Self::Disbursement => "realisasi",
            Self::Report => "laporan",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BudgetPlanning => "Perencanaan Anggaran",
            Self::Approval => "Persetujuan",
            Self::Disbursement => "Realisasi Dana",
            Self::Report => "Laporan",
        }
    }
}

impl fmt::Display for DisbursementTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DisbursementTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "anggaran" | "budget_planning" => Ok(Self::BudgetPlanning),
            "persetujuan" | "approval" => Ok(Self::Approval),
            "realisasi" | "disbursement" => Ok(Self::Disbursement),
            "laporan" | "report" => Ok(Self::Report),
            _ => Err(AppError::validation(format!("Unknown tab: '{s}'"))),
        }
    }
}

/// Tabs reachable by `role`, in display order. No role sees only the report.
pub fn allowed_tabs(role: Option<UserRole>) -> Vec<DisbursementTab> {
    use DisbursementTab::*;
    match role {
        Some(UserRole::Admin) => vec![BudgetPlanning, Approval, Disbursement, Report],
        Some(UserRole::Bendahara) => vec![BudgetPlanning, Disbursement, Report],
        Some(UserRole::Pengasuh) => vec![Approval, Report],
        None => vec![Report],
    }
}

/// The tab opened when none is requested.
pub fn default_tab(role: Option<UserRole>) -> DisbursementTab {
    match role {
        Some(UserRole::Pengasuh) => DisbursementTab::Approval,
        _ => DisbursementTab::BudgetPlanning,
    }
}

/// The tab to show for a request: the requested tab if reachable, else
/// the default tab, else the first reachable tab.
pub fn active_tab(role: Option<UserRole>, requested: Option<DisbursementTab>) -> DisbursementTab {
    let allowed = allowed_tabs(role);
    if let Some(tab) = requested.filter(|t| allowed.contains(t)) {
        return tab;
    }
    let fallback = default_tab(role);
    if allowed.contains(&fallback) {
        fallback
    } else {
        allowed.first().copied().unwrap_or(DisbursementTab::Report)
    }
}

/// Admin or pengasuh.
pub fn can_approve(role: Option<UserRole>) -> bool {
    matches!(role, Some(UserRole::Admin | UserRole::Pengasuh))
}

/// Admin or bendahara.
pub fn can_manage_budget(role: Option<UserRole>) -> bool {
    matches!(role, Some(UserRole::Admin | UserRole::Bendahara))
}

#[cfg(test)]
mod tests {
    use super::DisbursementTab::*;
    use super::*;

    #[test]
    fn test_allowed_tabs_per_role() {
        assert_eq!(allowed_tabs(Some(UserRole::Admin)), DisbursementTab::ALL.to_vec());
        assert_eq!(
            allowed_tabs(Some(UserRole::Bendahara)),
            vec![BudgetPlanning, Disbursement, Report]
        );
        assert_eq!(allowed_tabs(Some(UserRole::Pengasuh)), vec![Approval, Report]);
        assert_eq!(allowed_tabs(None), vec![Report]);
    }

    #[test]
    fn test_default_tab() {
        assert_eq!(default_tab(Some(UserRole::Pengasuh)), Approval);
        assert_eq!(default_tab(Some(UserRole::Bendahara)), BudgetPlanning);
        assert_eq!(default_tab(None), BudgetPlanning);
    }

    #[test]
    fn test_active_tab_falls_back() {
        let bendahara = Some(UserRole::Bendahara);
        assert_eq!(active_tab(bendahara, Some(Approval)), BudgetPlanning);
        assert_eq!(active_tab(bendahara, Some(Report)), Report);
        assert_eq!(active_tab(Some(UserRole::Pengasuh), None), Approval);
        assert_eq!(active_tab(None, Some(BudgetPlanning)), Report);
    }

    #[test]
    fn test_tab_keys_parse() {
        for tab in DisbursementTab::ALL {
            assert_eq!(tab.key().parse::<DisbursementTab>().unwrap(), tab);
        }
        assert_eq!("budget-planning".parse::<DisbursementTab>().unwrap(), BudgetPlanning);
        assert!("kas".parse::<DisbursementTab>().is_err());
    }

    #[test]
    fn test_workflow_roles() {
        assert!(can_approve(Some(UserRole::Pengasuh)));
        assert!(!can_approve(Some(UserRole::Bendahara)));
        assert!(can_manage_budget(Some(UserRole::Bendahara)));
        assert!(!can_manage_budget(Some(UserRole::Pengasuh)));
        assert!(!can_approve(None) && !can_manage_budget(None));
    }
}
