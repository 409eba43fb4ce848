//! Session lifecycle manager: login, logout, restoration and idle expiry.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use ptqa_cache::LocalStorage;
use ptqa_core::config::session::{CredentialScheme, SessionConfig};
use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::traits::clock::Clock;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::traits::navigation::{NavigationMode, Navigator};
use ptqa_database::repositories::{AuditLogRepository, UserRepository};
use ptqa_entity::audit::{AuditAction, CreateAuditLogEntry};
use ptqa_entity::user::{Principal, User};

use crate::password::CredentialHandler;
use crate::rbac::CapabilitySet;

use super::state::SessionState;
use super::store::SessionStore;

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Owns the single source of truth for who is logged in.
///
/// The current [`SessionState`] is published on a watch channel; it starts
/// as [`SessionState::Loading`] and leaves that state once
/// [`restore`](Self::restore) has run.
pub struct SessionManager {
    /// User lookups for credential checks.
    users: UserRepository,
    /// Audit sink for login, logout and auto-logout.
    audit: AuditLogRepository,
    /// Persisted session keys.
    store: SessionStore,
    /// Stored-credential comparison.
    credentials: CredentialHandler,
    /// Redirect target for logout.
    navigator: Arc<dyn Navigator>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Session configuration.
    config: SessionConfig,
    /// Published state.
    state: watch::Sender<SessionState>,
    /// Most recent activity seen by this instance, epoch millis.
    last_activity: Arc<AtomicI64>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager in the `Loading` state.
    pub fn new(
        adapter: Arc<dyn CollectionAdapter>,
        storage: LocalStorage,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            users: UserRepository::new(Arc::clone(&adapter)),
            audit: AuditLogRepository::new(adapter),
            store: SessionStore::new(storage),
            credentials: CredentialHandler::new(config.credential_scheme),
            navigator,
            clock,
            config,
            state,
            last_activity: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The logged-in principal, if any.
    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal().cloned()
    }

    /// The logged-in principal, or a session error.
    pub fn require_principal(&self) -> AppResult<Principal> {
        self.principal()
            .ok_or_else(|| AppError::session("Not logged in or session expired"))
    }

    /// Capabilities of the current principal.
    pub fn capabilities(&self) -> CapabilitySet {
        self.state.borrow().capabilities()
    }

    /// Authenticate and start a session.
    ///
    /// Lookup failures and unknown credentials produce the same
    /// authentication error. Inactive accounts never match.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Principal> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }

        let user = match self.lookup(username, password).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(username, "Login rejected");
                return Err(AppError::authentication(BAD_CREDENTIALS));
            }
            Err(e) => {
                warn!(username, error = %e, "Credential check failed");
                return Err(AppError::authentication(BAD_CREDENTIALS));
            }
        };

        let principal = Principal::from(&user);
        let now = self.clock.now_millis();

        if let Err(e) = self.persist(&principal, now).await {
            if let Err(clear_err) = self.store.clear().await {
                warn!(error = %clear_err, "Failed to roll back partial session write");
            }
            return Err(e);
        }

        self.last_activity.store(now, Ordering::SeqCst);
        self.state
            .send_replace(SessionState::Authenticated(principal.clone()));

        self.record_audit(
            AuditAction::Login,
            format!("{} login", principal.name),
            &principal.name,
        )
        .await;

        info!(
            user = %principal.username,
            role = %principal.role,
            "Login successful"
        );

        Ok(principal)
    }

    /// End the session and redirect to the login route.
    ///
    /// Audit failures are logged and do not block the logout. Calling
    /// this with nobody logged in only clears persisted keys again.
    pub async fn logout(&self) {
        if let Some(principal) = self.principal() {
            self.record_audit(
                AuditAction::Logout,
                format!("{} logout", principal.name),
                &principal.name,
            )
            .await;
            info!(user = %principal.username, "Logged out");
        }

        self.end_session().await;
        self.navigator
            .navigate(&self.config.login_route, NavigationMode::Soft);
    }

    /// Restore the persisted session, discarding it if it has been idle
    /// longer than the timeout. Always leaves the `Loading` state.
    pub async fn restore(&self) -> SessionState {
        let state = match self.restorable_principal().await {
            Some(principal) => SessionState::Authenticated(principal),
            None => SessionState::Unauthenticated,
        };
        self.state.send_replace(state.clone());
        state
    }

    /// Note user activity. Never performs network I/O; the persisted
    /// timestamp is written in the background.
    pub fn record_activity(&self) {
        if !self.state.borrow().is_authenticated() {
            return;
        }

        let now = self.clock.now_millis();
        let previous = self.last_activity.fetch_max(now, Ordering::SeqCst);
        if now <= previous {
            return;
        }

        let store = self.store.clone();
        let last_activity = Arc::clone(&self.last_activity);
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    // Zero means the session ended before this write ran.
                    if last_activity.load(Ordering::SeqCst) == 0 {
                        return;
                    }
                    if let Err(e) = store.save_last_activity(now).await {
                        warn!(error = %e, "Failed to persist last activity");
                        return;
                    }
                    if last_activity.load(Ordering::SeqCst) == 0 {
                        if let Err(e) = store.clear().await {
                            warn!(error = %e, "Failed to clear activity written after logout");
                        }
                    }
                });
            }
            Err(_) => debug!("No runtime available; last activity kept in memory"),
        }
    }

    /// Write the in-memory activity time to storage now.
    ///
    /// For short-lived callers that may exit before the background write
    /// of [`record_activity`](Self::record_activity) completes.
    pub async fn flush_activity(&self) -> AppResult<()> {
        if !self.state.borrow().is_authenticated() {
            return Ok(());
        }
        let last = self.last_activity.load(Ordering::SeqCst);
        if last > 0 {
            self.store.save_last_activity(last).await?;
        }
        Ok(())
    }

    /// Log out automatically if the session has been idle too long.
    ///
    /// The most recent of the persisted and in-memory activity times is
    /// used. Returns `true` if the session was ended.
    pub async fn check_inactivity(&self) -> bool {
        let Some(principal) = self.principal() else {
            return false;
        };

        let persisted = match self.store.load_last_activity().await {
            Ok(millis) => millis,
            Err(e) => {
                warn!(error = %e, "Failed to read last activity");
                None
            }
        };
        let last = persisted
            .unwrap_or(0)
            .max(self.last_activity.load(Ordering::SeqCst));
        let now = self.clock.now_millis();

        if !self.is_idle(last, now) {
            return false;
        }

        info!(
            user = %principal.username,
            idle_minutes = (now - last) / 60_000,
            "Session idle, logging out"
        );

        self.record_audit(
            AuditAction::AutoLogout,
            format!(
                "{} logout otomatis (tidak aktif {} menit)",
                principal.name, self.config.idle_timeout_minutes
            ),
            &principal.name,
        )
        .await;

        self.end_session().await;
        self.navigator
            .navigate(&self.config.login_route, NavigationMode::Hard);
        true
    }

    async fn lookup(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        match self.credentials.scheme() {
            CredentialScheme::Plaintext => {
                self.users
                    .find_active_by_credentials(username, password)
                    .await
            }
            CredentialScheme::Argon2 => match self.users.find_active_by_username(username).await? {
                Some(user) if self.credentials.matches(password, &user.password)? => Ok(Some(user)),
                _ => Ok(None),
            },
        }
    }

    async fn persist(&self, principal: &Principal, now: i64) -> AppResult<()> {
        self.store.save_principal(principal).await?;
        self.store.save_last_activity(now).await
    }

    async fn restorable_principal(&self) -> Option<Principal> {
        let principal = match self.store.load_principal().await {
            Ok(Some(principal)) => principal,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                return None;
            }
        };

        let last = match self.store.load_last_activity().await {
            Ok(millis) => millis,
            Err(e) => {
                warn!(error = %e, "Failed to read last activity");
                None
            }
        };

        match last {
            Some(last) if !self.is_idle(last, self.clock.now_millis()) => {
                self.last_activity.store(last, Ordering::SeqCst);
                info!(user = %principal.username, "Session restored");
                Some(principal)
            }
            _ => {
                info!(user = %principal.username, "Persisted session expired");
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "Failed to clear expired session");
                }
                None
            }
        }
    }

    async fn end_session(&self) {
        self.state.send_replace(SessionState::Unauthenticated);
        self.last_activity.store(0, Ordering::SeqCst);
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    async fn record_audit(&self, action: AuditAction, details: String, user_name: &str) {
        let entry = CreateAuditLogEntry::at(action, details, user_name, self.clock.now());
        if let Err(e) = self.audit.create(&entry).await {
            warn!(action = %action, error = %e, "Failed to write audit record");
        }
    }

    fn is_idle(&self, last: i64, now: i64) -> bool {
        let timeout = i64::try_from(self.config.idle_timeout_minutes)
            .unwrap_or(i64::MAX / 60_000)
            .saturating_mul(60_000);
        now.saturating_sub(last) > timeout
    }
}
