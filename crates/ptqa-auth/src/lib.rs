//! # ptqa-auth
//!
//! Who is logged in and what they may do.
//!
//! ## Modules
//!
//! - `session`: login, logout, restoration from persistence and inactivity expiry
//! - `rbac`: capability flags derived from roles, route visibility and enforcement
//! - `password`: credential storage schemes, Argon2id hashing and password policy

pub mod password;
pub mod rbac;
pub mod session;

pub use password::{CredentialHandler, PasswordHasher, PasswordValidator};
pub use rbac::{Capability, CapabilitySet, GuardDecision, RbacEnforcer, Route};
pub use session::{InactivityMonitor, SessionManager, SessionState, SessionStore};
