//! Capability enforcement for write operations.

use ptqa_core::error::AppError;
use ptqa_entity::user::Principal;

use super::capabilities::{Capability, CapabilitySet};

/// Checks that a principal holds the capability an operation requires.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Returns `Ok(())` if `principal` holds `capability`, or an
    /// authorization error otherwise.
    pub fn require(&self, principal: &Principal, capability: Capability) -> Result<(), AppError> {
        if CapabilitySet::for_role(principal.role).allows(capability) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{}' does not have capability '{capability:?}'",
                principal.role
            )))
        }
    }

    /// Checks whether `principal` holds `capability` (returns bool).
    pub fn has(&self, principal: &Principal, capability: Capability) -> bool {
        CapabilitySet::for_role(principal.role).allows(capability)
    }
}
