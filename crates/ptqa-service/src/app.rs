//! Application wiring: storage, backend, session, feed and services,
//! plus the lifecycle of the background timers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use ptqa_auth::password::{CredentialHandler, PasswordValidator};
use ptqa_auth::rbac::RbacEnforcer;
use ptqa_auth::session::{InactivityMonitor, SessionManager, SessionState};
use ptqa_cache::LocalStorage;
use ptqa_core::config::AppConfig;
use ptqa_core::result::AppResult;
use ptqa_core::traits::clock::{Clock, SystemClock};
use ptqa_core::traits::navigation::Navigator;
use ptqa_core::traits::storage::KeyValueStore;
use ptqa_database::Backend;
use ptqa_database::repositories::{
    AuditLogRepository, BudgetRepository, DisbursementRepository, StudentBillRepository,
    StudentRepository, TransactionRepository, UserRepository,
};

use crate::audit::AuditRecorder;
use crate::billing::BillingMessenger;
use crate::budget::BudgetService;
use crate::context::RequestContext;
use crate::finance::{DashboardService, TransactionService};
use crate::notification::{
    NotificationAggregator, NotificationFeed, NotificationPoller, NotificationRules, ReadAckStore,
};
use crate::user::AdminUserService;

/// Upper bound on waiting for a background task during teardown.
const TASK_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Every shared component of a running dashboard.
#[derive(Debug)]
pub struct Application {
    // ── Configuration ────────────────────────────────────────
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Time source.
    pub clock: Arc<dyn Clock>,

    // ── Infrastructure ───────────────────────────────────────
    /// Durable key-value storage.
    pub storage: LocalStorage,
    /// Remote collection backend.
    pub backend: Backend,

    // ── Session & notifications ──────────────────────────────
    /// Session lifecycle.
    pub session: Arc<SessionManager>,
    /// Derived notification feed.
    pub feed: Arc<NotificationFeed>,

    // ── Services ─────────────────────────────────────────────
    /// Audit trail.
    pub audit: Arc<AuditRecorder>,
    /// Budget workflow.
    pub budgets: Arc<BudgetService>,
    /// Cash-book writes.
    pub transactions: Arc<TransactionService>,
    /// Dashboard summary.
    pub dashboard: Arc<DashboardService>,
    /// Admin user management.
    pub users: Arc<AdminUserService>,
    /// Guardian messages.
    pub billing: Arc<BillingMessenger>,

    // ── Lifecycle ────────────────────────────────────────────
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Application {
    /// Build the application from configuration, restore the session and
    /// start the inactivity monitor and notification poller.
    pub async fn init(config: AppConfig, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        let app = Self::connect(config, navigator).await?;
        app.start().await;
        Ok(app)
    }

    /// Build the application from configuration without starting timers.
    pub async fn connect(config: AppConfig, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        let storage = LocalStorage::new(&config.storage).await?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(storage.clone());
        let backend = Backend::connect(&config.backend, kv)?;
        Ok(Self::from_parts(
            config,
            storage,
            backend,
            navigator,
            Arc::new(SystemClock),
        ))
    }

    /// Wire every component over the given infrastructure.
    pub fn from_parts(
        config: AppConfig,
        storage: LocalStorage,
        backend: Backend,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let adapter = backend.adapter();
        // Credentials and accounts are never answered from snapshots.
        let direct = backend.direct();

        // ── Repositories ─────────────────────────────────────
        let user_repo = Arc::new(UserRepository::new(Arc::clone(&direct)));
        let audit_repo = Arc::new(AuditLogRepository::new(Arc::clone(&adapter)));
        let transaction_repo = Arc::new(TransactionRepository::new(Arc::clone(&adapter)));
        let student_repo = Arc::new(StudentRepository::new(Arc::clone(&adapter)));
        let bill_repo = Arc::new(StudentBillRepository::new(Arc::clone(&adapter)));
        let budget_repo = Arc::new(BudgetRepository::new(Arc::clone(&adapter)));
        let disbursement_repo = Arc::new(DisbursementRepository::new(Arc::clone(&adapter)));

        // ── Session ──────────────────────────────────────────
        let session = Arc::new(SessionManager::new(
            direct,
            storage.clone(),
            Arc::clone(&navigator),
            Arc::clone(&clock),
            config.session.clone(),
        ));

        // ── Notifications ────────────────────────────────────
        let rules = NotificationRules::new(
            Arc::clone(&transaction_repo),
            Arc::clone(&bill_repo),
            Arc::clone(&budget_repo),
            config.notification.clone(),
        );
        let feed = Arc::new(NotificationFeed::new(
            NotificationAggregator::new(rules, Arc::clone(&clock)),
            ReadAckStore::new(storage.clone()),
            navigator,
        ));

        // ── Services ─────────────────────────────────────────
        let rbac = Arc::new(RbacEnforcer::new());
        let audit = Arc::new(AuditRecorder::new(audit_repo));
        let budgets = Arc::new(BudgetService::new(
            Arc::clone(&budget_repo),
            disbursement_repo,
            Arc::clone(&audit),
            Arc::clone(&rbac),
        ));
        let transactions = Arc::new(TransactionService::new(
            Arc::clone(&transaction_repo),
            Arc::clone(&audit),
            Arc::clone(&rbac),
        ));
        let dashboard = Arc::new(DashboardService::new(
            transaction_repo,
            Arc::clone(&student_repo),
            Arc::clone(&clock),
        ));
        let users = Arc::new(AdminUserService::new(
            user_repo,
            Arc::new(CredentialHandler::new(config.session.credential_scheme)),
            Arc::new(PasswordValidator::new(&config.session)),
            Arc::clone(&audit),
            rbac,
        ));
        let billing = Arc::new(BillingMessenger::new(student_repo, bill_repo, Arc::clone(&clock)));

        let (shutdown, _) = watch::channel(false);

        Self {
            config: Arc::new(config),
            clock,
            storage,
            backend,
            session,
            feed,
            audit,
            budgets,
            transactions,
            dashboard,
            users,
            billing,
            shutdown,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Restore the persisted session and spawn the background timers.
    /// Calling it again while timers run does nothing.
    pub async fn start(&self) -> SessionState {
        let state = self.session.restore().await;

        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            return state;
        }
        self.shutdown.send_replace(false);

        let monitor = InactivityMonitor::new(Arc::clone(&self.session), &self.config.session);
        tasks.push(monitor.spawn(self.shutdown.subscribe()));

        let poller = NotificationPoller::new(Arc::clone(&self.feed), &self.config.notification);
        tasks.push(poller.spawn(self.session.subscribe(), self.shutdown.subscribe()));

        info!(
            authenticated = state.is_authenticated(),
            backend = self.backend.adapter().provider_name(),
            "Application started"
        );
        state
    }

    /// Context for a write by the current principal.
    pub fn context(&self) -> AppResult<RequestContext> {
        RequestContext::from_session(&self.session, self.clock.as_ref())
    }

    /// Stop the background timers and wait for them to finish.
    pub async fn teardown(&self) {
        self.shutdown.send_replace(true);

        let handles: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        for handle in handles {
            match tokio::time::timeout(TASK_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Background task failed"),
                Err(_) => warn!("Background task did not stop in time"),
            }
        }
        info!("Application stopped");
    }
}
