//! Cash-book writes.

use std::sync::Arc;

use tracing::info;

use ptqa_auth::rbac::{Capability, RbacEnforcer};
use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::types::id::TransactionId;
use ptqa_database::repositories::TransactionRepository;
use ptqa_entity::audit::AuditAction;
use ptqa_entity::finance::{CreateTransaction, Transaction};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Records, edits and deletes transactions for roles that can edit.
#[derive(Debug, Clone)]
pub struct TransactionService {
    transactions: Arc<TransactionRepository>,
    audit: Arc<AuditRecorder>,
    rbac: Arc<RbacEnforcer>,
}

impl TransactionService {
    /// Creates a new transaction service.
    pub fn new(
        transactions: Arc<TransactionRepository>,
        audit: Arc<AuditRecorder>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            transactions,
            audit,
            rbac,
        }
    }

    /// All transactions, newest first.
    pub async fn list(&self) -> AppResult<Vec<Transaction>> {
        self.transactions.find_all().await
    }

    /// Record a new transaction.
    pub async fn record(&self, ctx: &RequestContext, data: &CreateTransaction) -> AppResult<Transaction> {
        self.rbac.require(&ctx.principal, Capability::Edit)?;
        validate(data)?;

        let created = self.transactions.create(data).await?;
        self.audit
            .record(ctx, AuditAction::TambahTransaksi, summary(data))
            .await;

        info!(id = %created.id, kind = %data.kind, amount = data.amount, "Transaction recorded");
        Ok(created)
    }

    /// Replace an existing transaction.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &TransactionId,
        data: &CreateTransaction,
    ) -> AppResult<Transaction> {
        self.rbac.require(&ctx.principal, Capability::Edit)?;
        validate(data)?;

        let updated = self.transactions.update(id, data).await?;
        self.audit
            .record(ctx, AuditAction::EditTransaksi, summary(data))
            .await;

        info!(%id, "Transaction updated");
        Ok(updated)
    }

    /// Delete a transaction.
    pub async fn delete(&self, ctx: &RequestContext, id: &TransactionId) -> AppResult<()> {
        self.rbac.require(&ctx.principal, Capability::Edit)?;

        self.transactions.delete(id).await?;
        self.audit
            .record(ctx, AuditAction::HapusTransaksi, format!("ID: {id}"))
            .await;

        info!(%id, "Transaction deleted");
        Ok(())
    }
}

fn validate(data: &CreateTransaction) -> AppResult<()> {
    if data.amount <= 0 {
        return Err(AppError::validation("Transaction amount must be positive"));
    }
    if data.category.trim().is_empty() {
        return Err(AppError::validation("Transaction category is required"));
    }
    Ok(())
}

fn summary(data: &CreateTransaction) -> String {
    format!("{}: {}", data.kind, data.description)
}
