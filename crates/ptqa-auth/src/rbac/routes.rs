//! Top-level routes and the route guard.

use std::fmt;

use serde::{Deserialize, Serialize};

use ptqa_core::config::session::SessionConfig;

use super::capabilities::CapabilitySet;
use crate::session::state::SessionState;

/// A top-level screen of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Overview with aggregates.
    Dashboard,
    /// Income and expense records.
    Finance,
    /// Student records and bills.
    Students,
    /// Budget planning, approval and disbursement.
    Disbursement,
    /// Notification feed.
    Notifications,
    /// Import and export tools.
    Tools,
    /// User administration.
    UserManagement,
}

impl Route {
    /// Every route in menu order.
    pub const ALL: [Route; 7] = [
        Self::Dashboard,
        Self::Finance,
        Self::Students,
        Self::Disbursement,
        Self::Notifications,
        Self::Tools,
        Self::UserManagement,
    ];

    /// The route's path.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Finance => "/keuangan",
            Self::Students => "/santri",
            Self::Disbursement => "/penyaluran",
            Self::Notifications => "/notifikasi",
            Self::Tools => "/tools",
            Self::UserManagement => "/users",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Finance => "Keuangan",
            Self::Students => "Santri",
            Self::Disbursement => "Penyaluran Dana",
            Self::Notifications => "Notifikasi",
            Self::Tools => "Tools",
            Self::UserManagement => "Manajemen User",
        }
    }

    /// The top-level route a path belongs to, e.g. `/keuangan/pengeluaran`
    /// belongs to [`Route::Finance`].
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Dashboard);
        }
        Self::ALL.into_iter().filter(|r| *r != Self::Dashboard).find(|r| {
            trimmed == r.path()
                || trimmed
                    .strip_prefix(r.path())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Whether the route is reachable with `caps`.
    pub fn is_visible(&self, caps: &CapabilitySet) -> bool {
        if !caps.is_logged_in {
            return false;
        }
        match self {
            Self::Tools => caps.can_edit,
            Self::UserManagement => caps.is_admin,
            _ => true,
        }
    }

    /// Routes reachable with `caps`, in menu order.
    pub fn visible_routes(caps: &CapabilitySet) -> Vec<Route> {
        Self::ALL
            .into_iter()
            .filter(|r| r.is_visible(caps))
            .collect()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session restoration has not finished; render nothing yet.
    Wait,
    /// No principal; go to the login entry point.
    RedirectToLogin,
    /// The principal may not see this route; go home.
    Forbidden,
    /// Render the route.
    Allow,
}

impl GuardDecision {
    /// Evaluate `route` against the current session state.
    pub fn evaluate(state: &SessionState, route: Route) -> Self {
        match state {
            SessionState::Loading => Self::Wait,
            SessionState::Unauthenticated => Self::RedirectToLogin,
            SessionState::Authenticated(principal) => {
                if route.is_visible(&CapabilitySet::resolve(Some(principal))) {
                    Self::Allow
                } else {
                    Self::Forbidden
                }
            }
        }
    }

    /// Where the decision sends the user, if anywhere.
    pub fn redirect<'a>(&self, config: &'a SessionConfig) -> Option<&'a str> {
        match self {
            Self::RedirectToLogin => Some(config.login_route.as_str()),
            Self::Forbidden => Some(config.home_route.as_str()),
            Self::Wait | Self::Allow => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ptqa_entity::user::{Principal, UserRole, UserStatus};

    use super::*;

    fn authenticated(role: UserRole) -> SessionState {
        SessionState::Authenticated(Principal {
            id: "u1".into(),
            username: "u".into(),
            name: "U".into(),
            role,
            status: UserStatus::Active,
        })
    }

    #[test]
    fn test_from_path_maps_sub_routes() {
        assert_eq!(Route::from_path("/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/keuangan/pengeluaran"), Some(Route::Finance));
        assert_eq!(Route::from_path("/penyaluran/persetujuan"), Some(Route::Disbursement));
        assert_eq!(Route::from_path("/santri/tagihan?tab=1"), Some(Route::Students));
        assert_eq!(Route::from_path("/usersx"), None);
    }

    #[test]
    fn test_visible_routes_by_role() {
        let admin = Route::visible_routes(&CapabilitySet::for_role(UserRole::Admin));
        assert_eq!(admin, Route::ALL.to_vec());

        let bendahara = Route::visible_routes(&CapabilitySet::for_role(UserRole::Bendahara));
        assert!(bendahara.contains(&Route::Tools));
        assert!(!bendahara.contains(&Route::UserManagement));

        let pengasuh = Route::visible_routes(&CapabilitySet::for_role(UserRole::Pengasuh));
        assert!(!pengasuh.contains(&Route::Tools));
        assert!(pengasuh.contains(&Route::Disbursement));

        assert!(Route::visible_routes(&CapabilitySet::default()).is_empty());
    }

    #[test]
    fn test_guard_decisions() {
        let config = SessionConfig::default();
        assert_eq!(GuardDecision::evaluate(&SessionState::Loading, Route::Finance), GuardDecision::Wait);

        let decision = GuardDecision::evaluate(&SessionState::Unauthenticated, Route::Finance);
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert_eq!(decision.redirect(&config), Some("/login"));

        let decision = GuardDecision::evaluate(&authenticated(UserRole::Pengasuh), Route::UserManagement);
        assert_eq!(decision, GuardDecision::Forbidden);
        assert_eq!(decision.redirect(&config), Some("/"));

        let decision = GuardDecision::evaluate(&authenticated(UserRole::Admin), Route::UserManagement);
        assert_eq!(decision, GuardDecision::Allow);
        assert_eq!(decision.redirect(&config), None);
    }
}
