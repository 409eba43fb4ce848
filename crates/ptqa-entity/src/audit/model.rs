//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use ptqa_core::types::id::AuditLogId;
use serde::{Deserialize, Serialize};

use super::action::AuditAction;

/// An immutable row of `audit_logs`.
///
/// `action` stays a plain string so that codes written by other clients
/// (imports, legacy screens) still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// Action code, e.g. `"LOGIN"`.
    pub action: String,
    /// Free-text description.
    #[serde(default)]
    pub details: String,
    /// Display name of the actor.
    #[serde(default)]
    pub user_name: String,
    /// When the action occurred.
    pub timestamp: DateTime<Utc>,
}

/// Data required to append an audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// Identifier to assign.
    pub id: AuditLogId,
    /// Action code.
    pub action: AuditAction,
    /// Free-text description.
    pub details: String,
    /// Display name of the actor.
    pub user_name: String,
    /// When the action occurred.
    pub timestamp: DateTime<Utc>,
}

impl CreateAuditLogEntry {
    /// Build a record stamped with a fresh id and the current time.
    pub fn now(action: AuditAction, details: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self::at(action, details, user_name, Utc::now())
    }

    /// Build a record stamped with a fresh id and an explicit time.
    pub fn at(
        action: AuditAction,
        details: impl Into<String>,
        user_name: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditLogId::generate(),
            action,
            details: details.into(),
            user_name: user_name.into(),
            timestamp,
        }
    }
}
