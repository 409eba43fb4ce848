//! # ptqa-service
//!
//! Business logic service layer for the PTQA dashboard. Services
//! orchestrate repositories, local storage and the session to implement
//! the notification feed, the budget approval workflow, user
//! administration, the cash book and guardian messaging.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. [`Application`] wires them
//! together and owns the background timers.

pub mod app;
pub mod audit;
pub mod billing;
pub mod budget;
pub mod context;
pub mod finance;
pub mod navigation;
pub mod notification;
pub mod user;

pub use app::Application;
pub use audit::AuditRecorder;
pub use billing::{BillingMessenger, WhatsAppMessage};
pub use budget::{BudgetFilter, BudgetService, DisbursementTab};
pub use context::RequestContext;
pub use finance::{DashboardService, DashboardSummary, TransactionService};
pub use navigation::LogNavigator;
pub use notification::{FeedFilter, NotificationAggregator, NotificationFeed, NotificationPoller};
pub use user::{AdminUserService, CreateUserRequest};
