//! Integration tests for the budget approval workflow.

mod helpers;

use chrono::NaiveDate;

use helpers::TestApp;
use ptqa_core::error::ErrorKind;
use ptqa_entity::budget::{BudgetStatus, CreateBudget, CreateDisbursement};
use ptqa_entity::notification::NotificationKind;
use ptqa_service::{BudgetFilter, DisbursementTab, budget};

fn proposal(name: &str, amount: i64) -> CreateBudget {
    CreateBudget {
        name: name.to_string(),
        amount,
        description: Some("Pengadaan semester genap".to_string()),
        period: Some("2024-03".to_string()),
    }
}

fn disbursement(budget_id: &ptqa_core::types::id::BudgetId, amount: i64) -> CreateDisbursement {
    CreateDisbursement {
        budget_id: budget_id.clone(),
        amount,
        description: Some("Pembelian tahap 1".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
    }
}

#[tokio::test]
async fn test_bendahara_proposes_and_pengasuh_approves() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let ctx = t.login_as("bendahara").await;
    let created = t
        .app
        .budgets
        .create_budget(&ctx, &proposal("Kitab Kuning", 750_000))
        .await
        .unwrap();
    assert_eq!(created.status, BudgetStatus::Pending);

    let err = t.app.budgets.approve(&ctx, &created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    t.app.session.logout().await;
    let ctx = t.login_as("pengasuh").await;
    let pending = t.app.budgets.pending_approvals(&BudgetFilter::default()).await.unwrap();
    assert_eq!(pending.len(), 1);

    let approved = t.app.budgets.approve(&ctx, &created.id).await.unwrap();
    assert_eq!(approved.status, BudgetStatus::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("Ustadz Ahmad"));
    assert!(approved.approved_at.is_some());
    assert!(
        t.app
            .budgets
            .pending_approvals(&BudgetFilter::default())
            .await
            .unwrap()
            .is_empty()
    );

    let rows = t.audit_rows().await;
    let decision = rows.iter().find(|(a, _, _)| a == "APPROVE_BUDGET").unwrap();
    assert_eq!(decision.1, "Anggaran \"Kitab Kuning\" disetujui");
    assert_eq!(decision.2, "Ustadz Ahmad");
}

#[tokio::test]
async fn test_decided_budget_cannot_be_decided_again() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let ctx = t.login_as("admin").await;
    let created = t
        .app
        .budgets
        .create_budget(&ctx, &proposal("Seragam", 2_000_000))
        .await
        .unwrap();

    let rejected = t.app.budgets.reject(&ctx, &created.id).await.unwrap();
    assert_eq!(rejected.status, BudgetStatus::Rejected);

    let err = t.app.budgets.approve(&ctx, &created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let stored = t.adapter.rows("fund_budgets").await;
    assert_eq!(stored[0]["status"], "rejected");

    let actions = t.audit_actions().await;
    assert_eq!(actions.iter().filter(|a| *a == "REJECT_BUDGET").count(), 1);
    assert!(!actions.iter().any(|a| a == "APPROVE_BUDGET"));
}

#[tokio::test]
async fn test_invalid_proposals_and_unknown_budgets() {
    let t = TestApp::new().await;
    t.app.session.restore().await;
    let ctx = t.login_as("admin").await;

    let err = t
        .app
        .budgets
        .create_budget(&ctx, &proposal("  ", 100_000))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = t
        .app
        .budgets
        .create_budget(&ctx, &proposal("Kosong", 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = t.app.budgets.approve(&ctx, &"missing".into()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_disbursement_needs_approved_budget() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let ctx = t.login_as("bendahara").await;
    let created = t
        .app
        .budgets
        .create_budget(&ctx, &proposal("Renovasi Asrama", 750_000))
        .await
        .unwrap();

    let err = t
        .app
        .budgets
        .record_disbursement(&ctx, &disbursement(&created.id, 300_000))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    t.app.session.logout().await;
    let approver = t.login_as("pengasuh").await;
    t.app.budgets.approve(&approver, &created.id).await.unwrap();

    let err = t
        .app
        .budgets
        .record_disbursement(&approver, &disbursement(&created.id, 300_000))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    t.app.session.logout().await;
    let ctx = t.login_as("bendahara").await;
    let recorded = t
        .app
        .budgets
        .record_disbursement(&ctx, &disbursement(&created.id, 300_000))
        .await
        .unwrap();
    assert_eq!(recorded.amount, 300_000);
    assert_eq!(t.app.budgets.disbursed_amount(&created.id).await.unwrap(), 300_000);

    let report = t.app.budgets.report().await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].disbursed, 300_000);
    assert_eq!(report[0].remaining, 450_000);

    let rows = t.audit_rows().await;
    let realisasi = rows.iter().find(|(a, _, _)| a == "REALISASI_DANA").unwrap();
    assert_eq!(realisasi.1, "Realisasi dana Rp 300.000 untuk \"Renovasi Asrama\"");
}

#[tokio::test]
async fn test_decision_reaches_bendahara_feed() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let ctx = t.login_as("bendahara").await;
    let created = t
        .app
        .budgets
        .create_budget(&ctx, &proposal("Kitab Kuning", 750_000))
        .await
        .unwrap();

    t.app.session.logout().await;
    let approver = t.login_as("pengasuh").await;
    let before = t.app.feed.refresh(&approver.principal).await;
    assert_eq!(before, 1);
    t.app.budgets.reject(&approver, &created.id).await.unwrap();
    assert_eq!(t.app.feed.refresh(&approver.principal).await, 0);

    t.app.session.logout().await;
    let ctx = t.login_as("bendahara").await;
    t.app.feed.refresh(&ctx.principal).await;
    let items = t.app.feed.items().await;
    let event = items
        .iter()
        .find(|e| e.id == format!("budget-{}", created.id))
        .unwrap();
    assert_eq!(event.kind, NotificationKind::Rejected);
    assert_eq!(event.title, "Anggaran Ditolak");
    assert_eq!(event.link, "/penyaluran/anggaran");
}

#[tokio::test]
async fn test_tabs_follow_logged_in_role() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let ctx = t.login_as("pengasuh").await;
    let role = Some(ctx.role());
    assert_eq!(
        budget::allowed_tabs(role),
        vec![DisbursementTab::Approval, DisbursementTab::Report]
    );
    assert_eq!(
        budget::active_tab(role, Some(DisbursementTab::BudgetPlanning)),
        DisbursementTab::Approval
    );

    t.app.session.logout().await;
    let ctx = t.login_as("bendahara").await;
    let role = Some(ctx.role());
    assert_eq!(budget::active_tab(role, None), DisbursementTab::BudgetPlanning);
    assert_eq!(
        budget::active_tab(role, Some(DisbursementTab::Approval)),
        DisbursementTab::BudgetPlanning
    );

    t.app.session.logout().await;
    assert_eq!(budget::active_tab(None, None), DisbursementTab::Report);
}
