//! Observable session state.

use ptqa_entity::user::Principal;

use crate::rbac::CapabilitySet;

/// Who is logged in, as published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Restoration from persistence has not completed yet.
    #[default]
    Loading,
    /// Nobody is logged in.
    Unauthenticated,
    /// A principal is logged in.
    Authenticated(Principal),
}

impl SessionState {
    /// The logged-in principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    /// Whether restoration is still pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether a principal is present.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Capabilities of the current principal.
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::resolve(self.principal())
    }
}
