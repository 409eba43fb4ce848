//! Notification rules: which records qualify as alerts and how each alert reads.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Months, Utc};

use ptqa_core::config::notification::NotificationConfig;
use ptqa_core::result::AppResult;
use ptqa_core::types::id::StudentId;
use ptqa_database::repositories::{BudgetRepository, StudentBillRepository, TransactionRepository};
use ptqa_entity::budget::{Budget, BudgetStatus};
use ptqa_entity::finance::Transaction;
use ptqa_entity::money::format_rupiah;
use ptqa_entity::notification::{NotificationEvent, NotificationKind};
use ptqa_entity::student::StudentBill;

/// Route of the expense list.
pub const EXPENSE_ROUTE: &str = "/keuangan/pengeluaran";
/// Route of the student bill list.
pub const BILLS_ROUTE: &str = "/santri/tagihan";
/// Route of the approval tab.
pub const APPROVAL_ROUTE: &str = "/penyaluran/persetujuan";
/// Route of the budget planning tab.
pub const BUDGET_ROUTE: &str = "/penyaluran/anggaran";

/// Id of the single pending-approvals alert.
pub const PENDING_APPROVALS_ID: &str = "pending-approvals";

/// Queries backing each alert kind.
#[derive(Debug, Clone)]
pub struct NotificationRules {
    /// Transaction repository.
    transactions: Arc<TransactionRepository>,
    /// Student bill repository.
    bills: Arc<StudentBillRepository>,
    /// Budget repository.
    budgets: Arc<BudgetRepository>,
    /// Thresholds and windows.
    config: NotificationConfig,
}

impl NotificationRules {
    /// Creates the rules over the given repositories.
    pub fn new(
        transactions: Arc<TransactionRepository>,
        bills: Arc<StudentBillRepository>,
        budgets: Arc<BudgetRepository>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            transactions,
            bills,
            budgets,
            config,
        }
    }

    /// Large expenses recorded within the trailing window, newest first.
    pub async fn large_expenses(&self, now: DateTime<Utc>) -> AppResult<Vec<NotificationEvent>> {
        let since = now - Duration::days(self.config.large_expense_window_days);
        let expenses = self
            .transactions
            .find_large_expenses(
                self.config.large_expense_threshold,
                since,
                self.config.large_expense_limit,
            )
            .await?;
        Ok(expenses.iter().map(|t| expense_event(t, now)).collect())
    }

    /// One alert per student with unpaid bills older than the overdue cutoff.
    pub async fn overdue_bills(&self, now: DateTime<Utc>) -> AppResult<Vec<NotificationEvent>> {
        let cutoff = overdue_cutoff(now, self.config.overdue_after_months);
        let bills = self.bills.find_unpaid_before(&cutoff).await?;
        Ok(overdue_events(&bills, self.config.overdue_after_months, now))
    }

    /// A single alert summarising budgets awaiting a decision, if any.
    pub async fn pending_approvals(&self, now: DateTime<Utc>) -> AppResult<Vec<NotificationEvent>> {
        let pending = self.budgets.find_by_status(BudgetStatus::Pending).await?;
        Ok(pending_event(pending.len(), now).into_iter().collect())
    }

    /// Budgets decided within the trailing window, newest first.
    pub async fn budget_decisions(&self, now: DateTime<Utc>) -> AppResult<Vec<NotificationEvent>> {
        let since = now - Duration::days(self.config.decision_window_days);
        let decided = self
            .budgets
            .find_decided_since(since, self.config.decision_limit)
            .await?;
        Ok(decided.iter().map(|b| decision_event(b, now)).collect())
    }
}

/// The `YYYY-MM` period `months` before `now`. Bills for earlier periods are overdue.
pub fn overdue_cutoff(now: DateTime<Utc>, months: u32) -> String {
    let date = now.date_naive();
    date.checked_sub_months(Months::new(months))
        .unwrap_or(date)
        .format("%Y-%m")
        .to_string()
}

/// Alert for a large expense.
pub fn expense_event(transaction: &Transaction, now: DateTime<Utc>) -> NotificationEvent {
    NotificationEvent::new(
        format!("expense-{}", transaction.id),
        NotificationKind::Expense,
        "Pengeluaran Besar",
        format!(
            "{}: {}",
            transaction.category_label(),
            format_rupiah(transaction.amount)
        ),
        transaction.created_at.unwrap_or(now),
        EXPENSE_ROUTE,
    )
}

/// Group overdue bills by student, keeping first-seen order.
pub fn overdue_events(bills: &[StudentBill], months: u32, now: DateTime<Utc>) -> Vec<NotificationEvent> {
    struct Arrears<'a> {
        student_id: &'a StudentId,
        name: &'a str,
        count: usize,
        total: i64,
    }

    let mut order: Vec<Arrears<'_>> = Vec::new();
    let mut index: HashMap<&StudentId, usize> = HashMap::new();
    for bill in bills {
        let slot = *index.entry(&bill.student_id).or_insert_with(|| {
            order.push(Arrears {
                student_id: &bill.student_id,
                name: bill.student_label(),
                count: 0,
                total: 0,
            });
            order.len() - 1
        });
        let arrears = &mut order[slot];
        arrears.count += 1;
        arrears.total += bill.amount;
    }

    order
        .into_iter()
        .map(|a| {
            NotificationEvent::new(
                format!("overdue-{}", a.student_id),
                NotificationKind::Overdue,
                format!("Tunggakan > {months} Bulan"),
                format!("{}: {} tagihan ({})", a.name, a.count, format_rupiah(a.total)),
                now,
                BILLS_ROUTE,
            )
        })
        .collect()
}

/// Alert summarising `count` pending budgets; none when there are none.
pub fn pending_event(count: usize, now: DateTime<Utc>) -> Option<NotificationEvent> {
    (count > 0).then(|| {
        NotificationEvent::new(
            PENDING_APPROVALS_ID,
            NotificationKind::Approval,
            "Persetujuan Anggaran",
            format!("{count} anggaran menunggu persetujuan"),
            now,
            APPROVAL_ROUTE,
        )
    })
}

/// Alert for a decided budget.
pub fn decision_event(budget: &Budget, now: DateTime<Utc>) -> NotificationEvent {
    let (kind, title) = match budget.status {
        BudgetStatus::Approved => (NotificationKind::Success, "Anggaran Disetujui"),
        _ => (NotificationKind::Rejected, "Anggaran Ditolak"),
    };
    NotificationEvent::new(
        format!("budget-{}", budget.id),
        kind,
        title,
        format!("{}: {}", budget.name, format_rupiah(budget.amount)),
        budget.approved_at.unwrap_or(now),
        BUDGET_ROUTE,
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_overdue_cutoff_crosses_year() {
        assert_eq!(overdue_cutoff(at(2024, 3, 15), 2), "2024-01");
        assert_eq!(overdue_cutoff(at(2024, 1, 31), 2), "2023-11");
        assert_eq!(overdue_cutoff(at(2024, 4, 30), 2), "2024-02");
    }

    #[test]
    fn test_expense_event_text() {
        let t: Transaction = serde_json::from_value(json!({
            "id": "t1", "type": "pengeluaran", "amount": "250000",
            "category": "Konsumsi", "created_at": "2024-03-12T08:00:00Z"
        }))
        .unwrap();
        let event = expense_event(&t, at(2024, 3, 15));
        assert_eq!(event.id, "expense-t1");
        assert_eq!(event.message, "Konsumsi: Rp 250.000");
        assert_eq!(event.date, Utc.with_ymd_and_hms(2024, 3, 12, 8, 0, 0).unwrap());
        assert_eq!(event.link, EXPENSE_ROUTE);
        assert!(!event.read);
    }

    #[test]
    fn test_overdue_events_group_by_student() {
        let bills: Vec<StudentBill> = serde_json::from_value(json!([
            {"id": "b1", "student_id": "s1", "student_name": "Ali", "amount": 150000, "month": "2023-12", "status": "Belum Lunas"},
            {"id": "b2", "student_id": "s2", "student_name": "", "amount": 100000, "month": "2023-12", "status": "Belum Lunas"},
            {"id": "b3", "student_id": "s1", "student_name": "Ali", "amount": 150000, "month": "2024-01", "status": "Belum Lunas"}
        ]))
        .unwrap();

        let events = overdue_events(&bills, 2, at(2024, 4, 1));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "overdue-s1");
        assert_eq!(events[0].title, "Tunggakan > 2 Bulan");
        assert_eq!(events[0].message, "Ali: 2 tagihan (Rp 300.000)");
        assert_eq!(events[1].message, "Santri: 1 tagihan (Rp 100.000)");
    }

    #[test]
    fn test_pending_event_only_when_budgets_wait() {
        assert!(pending_event(0, at(2024, 1, 1)).is_none());
        let event = pending_event(3, at(2024, 1, 1)).unwrap();
        assert_eq!(event.id, PENDING_APPROVALS_ID);
        assert_eq!(event.message, "3 anggaran menunggu persetujuan");
    }

    #[test]
    fn test_decision_event_kind_follows_status() {
        let budget: Budget = serde_json::from_value(json!({
            "id": "g1", "name": "Renovasi Asrama", "amount": 5000000,
            "status": "rejected", "approved_at": "2024-03-10T10:00:00Z"
        }))
        .unwrap();
        let event = decision_event(&budget, at(2024, 3, 15));
        assert_eq!(event.id, "budget-g1");
        assert_eq!(event.kind, NotificationKind::Rejected);
        assert_eq!(event.title, "Anggaran Ditolak");
        assert_eq!(event.message, "Renovasi Asrama: Rp 5.000.000");
    }
}
