//! Session lifecycle: login, logout, restoration and inactivity expiry.

pub mod manager;
pub mod monitor;
pub mod state;
pub mod store;

pub use manager::SessionManager;
pub use monitor::InactivityMonitor;
pub use state::SessionState;
pub use store::SessionStore;
