//! Context carrying the acting principal into service calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ptqa_auth::rbac::CapabilitySet;
use ptqa_auth::session::SessionManager;
use ptqa_core::result::AppResult;
use ptqa_core::traits::clock::Clock;
use ptqa_entity::user::{Principal, UserRole};

/// Who is acting, and when.
///
/// Built from the live session and passed into service methods so that
/// every write knows its actor for authorization and audit records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting principal.
    pub principal: Principal,
    /// When the request started.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(principal: Principal, request_time: DateTime<Utc>) -> Self {
        Self {
            principal,
            request_time,
        }
    }

    /// Context for the current session's principal, or a session error.
    pub fn from_session(session: &SessionManager, clock: &dyn Clock) -> AppResult<Self> {
        Ok(Self::new(session.require_principal()?, clock.now()))
    }

    /// The acting role.
    pub fn role(&self) -> UserRole {
        self.principal.role
    }

    /// Display name written into audit records.
    pub fn actor_name(&self) -> &str {
        &self.principal.name
    }

    /// Capabilities of the actor.
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::for_role(self.principal.role)
    }
}
