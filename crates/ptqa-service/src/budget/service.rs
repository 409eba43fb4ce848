//! Budget proposals, approval decisions and disbursements.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use ptqa_auth::rbac::{Capability, RbacEnforcer};
use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::types::id::BudgetId;
use ptqa_database::repositories::{BudgetRepository, DisbursementRepository};
use ptqa_entity::audit::AuditAction;
use ptqa_entity::budget::{
    Budget, BudgetDecision, BudgetStatus, CreateBudget, CreateDisbursement, Disbursement,
};
use ptqa_entity::money::format_rupiah;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Search and date-range filter over budgets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetFilter {
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    /// Inclusive lower bound.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDate>,
}

impl BudgetFilter {
    /// Whether `budget` passes the filter.
    ///
    /// The date checked is the creation date, or the period when the row
    /// has no creation time. Budgets with neither pass any date range.
    pub fn matches(&self, budget: &Budget) -> bool {
        if let Some(term) = self.search.as_deref().map(str::to_lowercase).filter(|t| !t.is_empty()) {
            let in_name = budget.name.to_lowercase().contains(&term);
            let in_description = budget
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            if !in_name && !in_description {
                return false;
            }
        }

        let Some(date) = budget_date(budget) else {
            return true;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

fn budget_date(budget: &Budget) -> Option<NaiveDate> {
    if let Some(created) = budget.created_at {
        return Some(created.date_naive());
    }
    let period = budget.period.as_deref()?.trim();
    NaiveDate::parse_from_str(period, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d"))
        .ok()
}

/// An approved budget with its disbursement totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReportLine {
    /// The budget.
    pub budget: Budget,
    /// Sum of recorded disbursements.
    pub disbursed: i64,
    /// Budget amount minus disbursed.
    pub remaining: i64,
}

/// Runs the budget workflow: pending, then approved or rejected for good.
#[derive(Debug, Clone)]
pub struct BudgetService {
    /// Budget repository.
    budgets: Arc<BudgetRepository>,
    /// Disbursement repository.
    disbursements: Arc<DisbursementRepository>,
    /// Audit recorder.
    audit: Arc<AuditRecorder>,
    /// Capability enforcement.
    rbac: Arc<RbacEnforcer>,
}

impl BudgetService {
    /// Creates a new budget service.
    pub fn new(
        budgets: Arc<BudgetRepository>,
        disbursements: Arc<DisbursementRepository>,
        audit: Arc<AuditRecorder>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            budgets,
            disbursements,
            audit,
            rbac,
        }
    }

    /// Budgets passing `filter`, newest first.
    pub async fn list(&self, filter: &BudgetFilter) -> AppResult<Vec<Budget>> {
        let budgets = self.budgets.find_all().await?;
        Ok(budgets.into_iter().filter(|b| filter.matches(b)).collect())
    }

    /// Pending budgets passing `filter`.
    pub async fn pending_approvals(&self, filter: &BudgetFilter) -> AppResult<Vec<Budget>> {
        let budgets = self.list(filter).await?;
        Ok(budgets
            .into_iter()
            .filter(|b| b.status == BudgetStatus::Pending)
            .collect())
    }

    /// Budgets that disbursements may be recorded against.
    pub async fn approved_budgets(&self) -> AppResult<Vec<Budget>> {
        self.budgets.find_by_status(BudgetStatus::Approved).await
    }

    /// Propose a new budget in the pending state.
    pub async fn create_budget(&self, ctx: &RequestContext, data: &CreateBudget) -> AppResult<Budget> {
        self.rbac.require(&ctx.principal, Capability::ManageBudget)?;

        if data.name.trim().is_empty() {
            return Err(AppError::validation("Budget name is required"));
        }
        if data.amount <= 0 {
            return Err(AppError::validation("Budget amount must be positive"));
        }

        let budget = self.budgets.create(data).await?;
        info!(
            budget_id = %budget.id,
            name = %budget.name,
            amount = budget.amount,
            actor = %ctx.principal.username,
            "Budget proposed"
        );
        Ok(budget)
    }

    /// Approve or reject a pending budget.
    ///
    /// Decided budgets are terminal: deciding again is a conflict.
    pub async fn decide(
        &self,
        ctx: &RequestContext,
        id: &BudgetId,
        decision: BudgetDecision,
    ) -> AppResult<Budget> {
        self.rbac.require(&ctx.principal, Capability::ApproveBudget)?;

        let budget = self
            .budgets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Budget '{id}' not found")))?;

        if budget.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "Budget '{}' has already been {}",
                budget.name,
                budget.status.as_str()
            )));
        }

        let updated = self
            .budgets
            .record_decision(id, decision.status(), ctx.actor_name(), ctx.request_time)
            .await?;

        let action = match decision {
            BudgetDecision::Approved => AuditAction::ApproveBudget,
            BudgetDecision::Rejected => AuditAction::RejectBudget,
        };
        self.audit
            .record(
                ctx,
                action,
                format!("Anggaran \"{}\" {}", budget.name, decision.verb()),
            )
            .await;

        info!(
            budget_id = %id,
            status = %updated.status,
            approver = %ctx.principal.username,
            "Budget decided"
        );
        Ok(updated)
    }

    /// Approve a pending budget.
    pub async fn approve(&self, ctx: &RequestContext, id: &BudgetId) -> AppResult<Budget> {
        self.decide(ctx, id, BudgetDecision::Approved).await
    }

    /// Reject a pending budget.
    pub async fn reject(&self, ctx: &RequestContext, id: &BudgetId) -> AppResult<Budget> {
        self.decide(ctx, id, BudgetDecision::Rejected).await
    }

    /// Record a disbursement against an approved budget.
    pub async fn record_disbursement(
        &self,
        ctx: &RequestContext,
        data: &CreateDisbursement,
    ) -> AppResult<Disbursement> {
        self.rbac.require(&ctx.principal, Capability::ManageBudget)?;

        if data.amount <= 0 {
            return Err(AppError::validation("Disbursement amount must be positive"));
        }

        let budget = self
            .budgets
            .find_by_id(&data.budget_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Budget '{}' not found", data.budget_id)))?;

        if budget.status != BudgetStatus::Approved {
            return Err(AppError::validation(format!(
                "Budget '{}' is {}; disbursements need an approved budget",
                budget.name,
                budget.status.as_str()
            )));
        }

        let disbursement = self.disbursements.create(data, &budget.name).await?;

        self.audit
            .record(
                ctx,
                AuditAction::RealisasiDana,
                format!(
                    "Realisasi dana {} untuk \"{}\"",
                    format_rupiah(data.amount),
                    budget.name
                ),
            )
            .await;

        info!(
            budget_id = %budget.id,
            amount = data.amount,
            actor = %ctx.principal.username,
            "Disbursement recorded"
        );
        Ok(disbursement)
    }

    /// Total disbursed against a budget.
    pub async fn disbursed_amount(&self, budget_id: &BudgetId) -> AppResult<i64> {
        let entries = self.disbursements.find_by_budget(budget_id).await?;
        Ok(entries.iter().map(|d| d.amount).sum())
    }

    /// Approved budgets with disbursed and remaining amounts.
    pub async fn report(&self) -> AppResult<Vec<BudgetReportLine>> {
        let approved = self.approved_budgets().await?;
        let disbursements = self.disbursements.find_all().await?;

        Ok(approved
            .into_iter()
            .map(|budget| {
                let disbursed: i64 = disbursements
                    .iter()
                    .filter(|d| d.budget_id == budget.id)
                    .map(|d| d.amount)
                    .sum();
                BudgetReportLine {
                    remaining: budget.amount - disbursed,
                    disbursed,
                    budget,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn budget(value: serde_json::Value) -> Budget {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filter_search_and_range() {
        let b = budget(json!({
            "id": "g1", "name": "Renovasi Asrama", "amount": 100,
            "description": "Atap bocor", "created_at": "2024-03-10T10:00:00Z"
        }));

        assert!(BudgetFilter::default().matches(&b));
        let search = |s: &str| BudgetFilter { search: Some(s.into()), ..Default::default() };
        assert!(search("asrama").matches(&b));
        assert!(search("BOCOR").matches(&b));
        assert!(!search("kitab").matches(&b));

        let range = BudgetFilter {
            start: NaiveDate::from_ymd_opt(2024, 3, 1),
            end: NaiveDate::from_ymd_opt(2024, 3, 10),
            ..Default::default()
        };
        assert!(range.matches(&b));
        let later = BudgetFilter {
            start: NaiveDate::from_ymd_opt(2024, 3, 11),
            ..Default::default()
        };
        assert!(!later.matches(&b));
    }

    #[test]
    fn test_filter_uses_period_without_created_at() {
        let b = budget(json!({"id": "g2", "name": "Kitab", "amount": 1, "period": "2024-05"}));
        let may = BudgetFilter {
            start: NaiveDate::from_ymd_opt(2024, 5, 1),
            end: NaiveDate::from_ymd_opt(2024, 5, 31),
            ..Default::default()
        };
        assert!(may.matches(&b));
        let june = BudgetFilter {
            start: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..Default::default()
        };
        assert!(!june.matches(&b));
    }
}
