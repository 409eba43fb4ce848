//! Integration tests for the notification feed.

mod helpers;

use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::json;

use helpers::TestApp;
use ptqa_core::error::ErrorKind;
use ptqa_core::traits::navigation::NavigationMode;
use ptqa_entity::notification::{NotificationEvent, NotificationKind};
use ptqa_service::FeedFilter;

fn ago(now: DateTime<Utc>, days: i64) -> String {
    (now - ChronoDuration::days(days)).to_rfc3339()
}

/// Seed one qualifying record per rule plus records each rule must ignore.
async fn seed_alerts(t: &TestApp) {
    let now = t.now();
    let this_month = now.format("%Y-%m").to_string();

    t.seed(
        "transactions",
        vec![
            json!({"id": "t-big", "type": "pengeluaran", "amount": 500000, "category": "Renovasi", "created_at": ago(now, 1)}),
            json!({"id": "t-small", "type": "pengeluaran", "amount": 100000, "category": "ATK", "created_at": ago(now, 1)}),
            json!({"id": "t-old", "type": "pengeluaran", "amount": 900000, "category": "Listrik", "created_at": ago(now, 10)}),
            json!({"id": "t-in", "type": "pemasukan", "amount": 1000000, "category": "SPP", "created_at": ago(now, 1)}),
        ],
    )
    .await;

    t.seed(
        "student_bills",
        vec![
            json!({"id": "b1", "student_id": "s1", "student_name": "Ali", "amount": 150000, "month": "2000-01", "status": "Belum Lunas"}),
            json!({"id": "b2", "student_id": "s1", "student_name": "Ali", "amount": 150000, "month": "2000-02", "status": "Belum Lunas"}),
            json!({"id": "b3", "student_id": "s2", "student_name": "Umar", "amount": 150000, "month": "2000-01", "status": "Lunas"}),
            json!({"id": "b4", "student_id": "s2", "student_name": "Umar", "amount": 150000, "month": this_month, "status": "Belum Lunas"}),
        ],
    )
    .await;

    t.seed(
        "fund_budgets",
        vec![
            json!({"id": "g-pending", "name": "Kitab Baru", "amount": 750000, "status": "pending", "created_at": ago(now, 2)}),
            json!({"id": "g-ok", "name": "Renovasi Asrama", "amount": 5000000, "status": "approved", "approved_by": "Ustadz Ahmad", "approved_at": ago(now, 3), "created_at": ago(now, 5)}),
            json!({"id": "g-old", "name": "Seragam", "amount": 2000000, "status": "rejected", "approved_by": "Ustadz Ahmad", "approved_at": ago(now, 20), "created_at": ago(now, 25)}),
        ],
    )
    .await;
}

fn ids(events: &[NotificationEvent]) -> Vec<&str> {
    events.iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn test_events_depend_on_role() {
    let t = TestApp::new().await;
    seed_alerts(&t).await;
    t.app.session.restore().await;

    let admin = t.app.session.login("admin", "admin123").await.unwrap();
    t.app.feed.refresh(&admin).await;
    let items = t.app.feed.items().await;
    let mut admin_ids = ids(&items);
    admin_ids.sort_unstable();
    assert_eq!(
        admin_ids,
        vec!["budget-g-ok", "expense-t-big", "overdue-s1", "pending-approvals"]
    );

    t.app.session.logout().await;
    let bendahara = t.app.session.login("bendahara", "bendahara123").await.unwrap();
    t.app.feed.refresh(&bendahara).await;
    let items = t.app.feed.items().await;
    assert!(items.iter().all(|e| e.kind != NotificationKind::Approval));
    assert!(items.iter().any(|e| e.id == "budget-g-ok"));

    t.app.session.logout().await;
    let pengasuh = t.app.session.login("pengasuh", "pengasuh123").await.unwrap();
    t.app.feed.refresh(&pengasuh).await;
    let items = t.app.feed.items().await;
    assert!(items.iter().any(|e| e.id == "pending-approvals"));
    assert!(items.iter().all(|e| !e.id.starts_with("budget-")));
}

#[tokio::test]
async fn test_feed_is_newest_first_with_expected_text() {
    let t = TestApp::new().await;
    seed_alerts(&t).await;
    t.app.session.restore().await;
    let admin = t.app.session.login("admin", "admin123").await.unwrap();
    t.app.feed.refresh(&admin).await;

    let items = t.app.feed.items().await;
    for pair in items.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }

    let overdue = items.iter().find(|e| e.id == "overdue-s1").unwrap();
    assert_eq!(overdue.kind, NotificationKind::Overdue);
    assert_eq!(overdue.title, "Tunggakan > 2 Bulan");
    assert_eq!(overdue.message, "Ali: 2 tagihan (Rp 300.000)");

    let pending = items.iter().find(|e| e.id == "pending-approvals").unwrap();
    assert_eq!(pending.message, "1 anggaran menunggu persetujuan");
    assert_eq!(pending.link, "/penyaluran/persetujuan");

    let expense = items.iter().find(|e| e.id == "expense-t-big").unwrap();
    assert_eq!(expense.message, "Renovasi: Rp 500.000");

    let decided = items.iter().find(|e| e.id == "budget-g-ok").unwrap();
    assert_eq!(decided.kind, NotificationKind::Success);
    assert_eq!(decided.message, "Renovasi Asrama: Rp 5.000.000");
}

#[tokio::test]
async fn test_failed_query_drops_only_its_events() {
    let t = TestApp::new().await;
    seed_alerts(&t).await;
    t.adapter.set_unavailable("student_bills", true).await;
    t.app.session.restore().await;
    let admin = t.app.session.login("admin", "admin123").await.unwrap();

    let count = t.app.feed.refresh(&admin).await;
    assert_eq!(count, 3);
    assert!(t.app.feed.items().await.iter().all(|e| e.kind != NotificationKind::Overdue));
}

#[tokio::test]
async fn test_read_state_survives_reload_and_refresh() {
    let t = TestApp::new().await;
    seed_alerts(&t).await;
    t.app.session.restore().await;
    let admin = t.app.session.login("admin", "admin123").await.unwrap();
    t.app.feed.refresh(&admin).await;
    assert_eq!(t.app.feed.unread_count().await, 4);

    let opened = t.app.feed.open("overdue-s1").await.unwrap();
    assert!(opened.read);
    assert_eq!(
        t.navigator.last(),
        Some(("/santri/tagihan".to_string(), NavigationMode::Soft))
    );
    assert_eq!(t.app.feed.unread_count().await, 3);

    let reloaded = t.reload();
    reloaded.app.feed.refresh(&admin).await;
    let unread = reloaded.app.feed.filtered(FeedFilter::Unread).await;
    assert_eq!(unread.len(), 3);
    assert!(unread.iter().all(|e| e.id != "overdue-s1"));

    reloaded.app.feed.mark_all_read().await.unwrap();
    assert_eq!(reloaded.app.feed.unread_count().await, 0);

    // Acknowledgements made elsewhere show up without a refresh.
    assert_eq!(t.app.feed.unread_count().await, 0);
}

#[tokio::test]
async fn test_open_unknown_event_is_not_found() {
    let t = TestApp::new().await;
    t.app.session.restore().await;
    let admin = t.app.session.login("admin", "admin123").await.unwrap();
    t.app.feed.refresh(&admin).await;

    let err = t.app.feed.open("expense-missing").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(t.navigator.requests().is_empty());
}

#[tokio::test]
async fn test_filter_by_kind() {
    let t = TestApp::new().await;
    seed_alerts(&t).await;
    t.app.session.restore().await;
    let admin = t.app.session.login("admin", "admin123").await.unwrap();
    t.app.feed.refresh(&admin).await;

    let filter: FeedFilter = "overdue".parse().unwrap();
    assert_eq!(ids(&t.app.feed.filtered(filter).await), vec!["overdue-s1"]);
    assert!("bogus".parse::<FeedFilter>().is_err());
}

#[tokio::test]
async fn test_repeated_refresh_keeps_snapshot_count_flat() {
    let t = TestApp::with_cache_fallback().await;
    seed_alerts(&t).await;
    t.app.session.restore().await;
    let admin = t.app.session.login("admin", "admin123").await.unwrap();

    assert_eq!(t.app.feed.refresh(&admin).await, 4);
    let stored = t.kv.len();

    for _ in 0..5 {
        t.clock.advance(ChronoDuration::seconds(30));
        assert_eq!(t.app.feed.refresh(&admin).await, 4);
        assert_eq!(t.kv.len(), stored);
    }

    // The latest rows still answer when the backend drops out.
    t.adapter.set_unavailable("transactions", true).await;
    t.adapter.set_unavailable("student_bills", true).await;
    t.adapter.set_unavailable("fund_budgets", true).await;
    t.clock.advance(ChronoDuration::seconds(30));
    assert_eq!(t.app.feed.refresh(&admin).await, 4);
}

#[tokio::test]
async fn test_poller_follows_session() {
    let t = TestApp::new().await;
    seed_alerts(&t).await;
    t.app.start().await;
    assert!(t.app.feed.items().await.is_empty());

    t.login_as("admin").await;
    let mut populated = false;
    for _ in 0..200 {
        if t.app.feed.items().await.len() == 4 {
            populated = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(populated, "feed should fill after login");

    t.app.session.logout().await;
    let mut cleared = false;
    for _ in 0..200 {
        if t.app.feed.items().await.is_empty() {
            cleared = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(cleared, "feed should empty after logout");

    t.app.teardown().await;
}
