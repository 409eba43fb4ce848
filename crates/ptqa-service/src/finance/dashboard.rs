//! Dashboard summary over the cash book and student roster.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use ptqa_core::result::AppResult;
use ptqa_core::traits::clock::Clock;
use ptqa_database::repositories::{StudentRepository, TransactionRepository};
use ptqa_entity::finance::{Transaction, TransactionType};
use ptqa_entity::student::Student;

/// Short month labels of the chart series.
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Number of transactions in the recent-activity list.
const RECENT_LIMIT: usize = 5;

/// Income and expense of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Short month label.
    pub label: String,
    /// Income booked in the month.
    pub income: i64,
    /// Expense booked in the month.
    pub expense: i64,
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Sum of all income.
    pub total_income: i64,
    /// Sum of all expense.
    pub total_expense: i64,
    /// Income minus expense.
    pub balance: i64,
    /// Income booked in the current month.
    pub month_income: i64,
    /// Expense booked in the current month.
    pub month_expense: i64,
    /// Currently enrolled students.
    pub active_students: usize,
    /// January to December of the current year.
    pub monthly: Vec<MonthlyPoint>,
    /// Most recent transactions by booking date.
    pub recent: Vec<Transaction>,
}

/// Builds the dashboard summary.
#[derive(Debug, Clone)]
pub struct DashboardService {
    /// Transaction repository.
    transactions: Arc<TransactionRepository>,
    /// Student repository.
    students: Arc<StudentRepository>,
    /// Time source for "this month".
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(
        transactions: Arc<TransactionRepository>,
        students: Arc<StudentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactions,
            students,
            clock,
        }
    }

    /// Summary as of now.
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let (transactions, students) =
            tokio::try_join!(self.transactions.find_all(), self.students.find_all())?;
        Ok(summarize(
            &transactions,
            &students,
            self.clock.now().date_naive(),
        ))
    }
}

/// Compute the summary for `today`.
pub fn summarize(transactions: &[Transaction], students: &[Student], today: NaiveDate) -> DashboardSummary {
    let mut total_income = 0;
    let mut total_expense = 0;
    let mut month_income = 0;
    let mut month_expense = 0;
    let mut monthly: Vec<MonthlyPoint> = MONTH_LABELS
        .iter()
        .map(|label| MonthlyPoint {
            label: (*label).to_string(),
            income: 0,
            expense: 0,
        })
        .collect();

    for t in transactions {
        let date = t.effective_date();
        let this_year = date.is_some_and(|d| d.year() == today.year());
        let this_month = this_year && date.is_some_and(|d| d.month() == today.month());

        match t.kind {
            TransactionType::Pemasukan => {
                total_income += t.amount;
                if this_month {
                    month_income += t.amount;
                }
            }
            TransactionType::Pengeluaran => {
                total_expense += t.amount;
                if this_month {
                    month_expense += t.amount;
                }
            }
        }

        if let Some(d) = date.filter(|_| this_year) {
            let point = &mut monthly[d.month0() as usize];
            match t.kind {
                TransactionType::Pemasukan => point.income += t.amount,
                TransactionType::Pengeluaran => point.expense += t.amount,
            }
        }
    }

    let mut recent = transactions.to_vec();
    recent.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));
    recent.truncate(RECENT_LIMIT);

    DashboardSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        month_income,
        month_expense,
        active_students: students.iter().filter(|s| s.is_active()).count(),
        monthly,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_summarize() {
        let transactions: Vec<Transaction> = serde_json::from_value(json!([
            {"id": 1, "type": "pemasukan", "amount": 1000000, "date": "2024-03-02"},
            {"id": 2, "type": "pengeluaran", "amount": "250000", "date": "2024-03-05"},
            {"id": 3, "type": "pemasukan", "amount": 500000, "date": "2024-01-20"},
            {"id": 4, "type": "pengeluaran", "amount": 100000, "date": "2023-03-10"},
            {"id": 5, "type": "pemasukan", "amount": 50000, "date": "2024-02-11"},
            {"id": 6, "type": "pemasukan", "amount": 10000, "date": "2024-02-01"}
        ]))
        .unwrap();
        let students: Vec<Student> = serde_json::from_value(json!([
            {"id": "s1", "name": "Ali", "status": "Aktif"},
            {"id": "s2", "name": "Umar", "status": "Lulus"},
            {"id": "s3", "name": "Hasan"}
        ]))
        .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let summary = summarize(&transactions, &students, today);

        assert_eq!(summary.total_income, 1_560_000);
        assert_eq!(summary.total_expense, 350_000);
        assert_eq!(summary.balance, 1_210_000);
        assert_eq!(summary.month_income, 1_000_000);
        assert_eq!(summary.month_expense, 250_000);
        assert_eq!(summary.active_students, 2);

        assert_eq!(summary.monthly.len(), 12);
        assert_eq!(summary.monthly[0].income, 500_000);
        assert_eq!(summary.monthly[2].expense, 250_000);
        assert_eq!(summary.monthly[2].label, "Mar");

        let recent: Vec<String> = summary.recent.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(recent, vec!["2", "1", "5", "6", "3"]);
    }
}
