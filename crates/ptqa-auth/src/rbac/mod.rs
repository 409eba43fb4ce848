//! Role-derived capabilities, route visibility and enforcement.

pub mod capabilities;
pub mod enforcer;
pub mod routes;

pub use capabilities::{Capability, CapabilitySet};
pub use enforcer::RbacEnforcer;
pub use routes::{GuardDecision, Route};
