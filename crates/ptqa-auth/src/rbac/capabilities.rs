//! Capability flags derived from the principal's role.

use serde::{Deserialize, Serialize};

use ptqa_entity::user::{Principal, UserRole};

/// A single permission that an operation can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create and edit finance and student data.
    Edit,
    /// Manage user accounts.
    Admin,
    /// Approve or reject budgets.
    ApproveBudget,
    /// Propose budgets and record disbursements.
    ManageBudget,
}

/// Boolean permissions of the current principal.
///
/// Resolution is total: an absent principal yields every flag `false`.
/// The legacy `user` role string is normalised to [`UserRole::Pengasuh`]
/// when the principal is decoded, so both spellings resolve identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// A principal is present.
    pub is_logged_in: bool,
    /// Admin or bendahara.
    pub can_edit: bool,
    /// Role is admin.
    pub is_admin: bool,
    /// Role is bendahara (treasurer).
    pub is_bendahara: bool,
    /// Role is pengasuh (supervisor).
    pub is_pengasuh: bool,
}

impl CapabilitySet {
    /// Resolve the capability set of an optional principal.
    pub fn resolve(principal: Option<&Principal>) -> Self {
        principal
            .map(|p| Self::for_role(p.role))
            .unwrap_or_default()
    }

    /// Capabilities of a logged-in principal with `role`.
    pub fn for_role(role: UserRole) -> Self {
        let is_admin = role == UserRole::Admin;
        let is_bendahara = role == UserRole::Bendahara;
        let is_pengasuh = role == UserRole::Pengasuh;
        Self {
            is_logged_in: true,
            can_edit: is_admin || is_bendahara,
            is_admin,
            is_bendahara,
            is_pengasuh,
        }
    }

    /// Admin or pengasuh.
    pub fn can_approve(&self) -> bool {
        self.is_admin || self.is_pengasuh
    }

    /// Admin or bendahara.
    pub fn can_manage_budget(&self) -> bool {
        self.is_admin || self.is_bendahara
    }

    /// Whether the set grants `capability`.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Edit => self.can_edit,
            Capability::Admin => self.is_admin,
            Capability::ApproveBudget => self.can_approve(),
            Capability::ManageBudget => self.can_manage_budget(),
        }
    }
}
