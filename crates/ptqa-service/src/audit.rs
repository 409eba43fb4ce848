//! Audit trail for workflow and administration actions.

use std::sync::Arc;

use tracing::warn;

use ptqa_core::result::AppResult;
use ptqa_database::repositories::AuditLogRepository;
use ptqa_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry};

use crate::context::RequestContext;

/// Appends audit records on behalf of services.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    /// Audit log repository.
    audit_repo: Arc<AuditLogRepository>,
}

impl AuditRecorder {
    /// Creates a new audit recorder.
    pub fn new(audit_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_repo }
    }

    /// Record `action` by the context's actor, stamped with the request time.
    ///
    /// The action being audited has already been committed, so a failed
    /// append is logged and not returned.
    pub async fn record(&self, ctx: &RequestContext, action: AuditAction, details: impl Into<String>) {
        let entry = CreateAuditLogEntry::at(action, details, ctx.actor_name(), ctx.request_time);
        if let Err(e) = self.audit_repo.create(&entry).await {
            warn!(
                action = %action,
                actor = %ctx.principal.username,
                error = %e,
                "Failed to write audit record"
            );
        }
    }

    /// Most recent entries first.
    pub async fn recent(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>> {
        self.audit_repo.find_recent(limit).await
    }
}
