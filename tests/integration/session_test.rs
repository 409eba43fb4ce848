//! Integration tests for login, restoration, guards and idle expiry.

mod helpers;

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use serde_json::json;

use helpers::TestApp;
use ptqa_auth::rbac::{GuardDecision, Route};
use ptqa_auth::session::SessionState;
use ptqa_core::error::ErrorKind;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::traits::navigation::NavigationMode;
use ptqa_entity::user::UserRole;

#[tokio::test]
async fn test_login_persists_and_reload_restores() {
    let t = TestApp::new().await;
    assert_eq!(t.app.session.state(), SessionState::Loading);
    assert_eq!(t.app.session.restore().await, SessionState::Unauthenticated);

    let principal = t.app.session.login("bendahara", "bendahara123").await.unwrap();
    assert_eq!(principal.role, UserRole::Bendahara);
    assert_eq!(principal.name, "Ibu Siti");

    let reloaded = t.reload();
    let state = reloaded.app.session.restore().await;
    assert_eq!(state.principal().map(|p| p.username.as_str()), Some("bendahara"));
    assert!(reloaded.app.context().is_ok());

    assert_eq!(t.audit_actions().await, vec!["LOGIN"]);
}

#[tokio::test]
async fn test_legacy_user_role_logs_in_as_pengasuh() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let principal = t.app.session.login("pengasuh", "pengasuh123").await.unwrap();
    assert_eq!(principal.role, UserRole::Pengasuh);

    let caps = t.app.session.capabilities();
    assert!(caps.can_approve());
    assert!(!caps.can_edit);
}

#[tokio::test]
async fn test_bad_credentials_and_inactive_accounts_are_rejected() {
    let t = TestApp::new().await;
    t.app.session.restore().await;

    let err = t.app.session.login("admin", "wrong").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    let err = t.app.session.login("lama", "lama123").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    let err = t.app.session.login("  ", "x").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(t.app.session.state(), SessionState::Unauthenticated);
    assert!(t.audit_rows().await.is_empty());
}

#[tokio::test]
async fn test_logout_clears_persistence_and_redirects() {
    let t = TestApp::new().await;
    t.app.session.restore().await;
    t.login_as("admin").await;

    t.app.session.logout().await;
    assert_eq!(t.app.session.state(), SessionState::Unauthenticated);
    assert_eq!(
        t.navigator.last(),
        Some(("/login".to_string(), NavigationMode::Soft))
    );

    let reloaded = t.reload();
    assert_eq!(reloaded.app.session.restore().await, SessionState::Unauthenticated);
    assert_eq!(t.audit_actions().await, vec!["LOGIN", "LOGOUT"]);
}

#[tokio::test]
async fn test_login_never_falls_back_to_stored_rows() {
    let t = TestApp::with_cache_fallback().await;
    t.app.session.restore().await;
    t.login_as("admin").await;
    t.app.session.logout().await;

    // Nothing derived from the credential lookup is kept locally.
    assert!(t.kv.is_empty());

    t.adapter
        .update("users", "u-admin", json!({"status": "inactive"}))
        .await
        .unwrap();
    t.adapter.set_unavailable("users", true).await;

    let err = t.app.session.login("admin", "admin123").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(t.app.session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_reload_after_idle_timeout_starts_logged_out() {
    let t = TestApp::new().await;
    t.app.session.restore().await;
    t.login_as("admin").await;

    t.clock.advance(ChronoDuration::minutes(31));

    let reloaded = t.reload();
    assert_eq!(reloaded.app.session.restore().await, SessionState::Unauthenticated);
}

#[tokio::test(start_paused = true)]
async fn test_idle_session_is_logged_out_by_monitor() {
    let t = TestApp::new().await;
    t.app.start().await;
    t.login_as("bendahara").await;

    // Activity keeps the session alive past the original deadline.
    t.clock.advance(ChronoDuration::minutes(20));
    t.app.session.record_activity();
    t.clock.advance(ChronoDuration::minutes(20));
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert!(t.app.session.state().is_authenticated());

    t.clock.advance(ChronoDuration::minutes(11));
    for _ in 0..120 {
        if !t.app.session.state().is_authenticated() {
            break;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    assert_eq!(t.app.session.state(), SessionState::Unauthenticated);
    assert_eq!(
        t.navigator.last(),
        Some(("/login".to_string(), NavigationMode::Hard))
    );

    let rows = t.audit_rows().await;
    let auto: Vec<_> = rows.iter().filter(|(a, _, _)| a == "AUTO_LOGOUT").collect();
    assert_eq!(auto.len(), 1);
    assert_eq!(auto[0].1, "Ibu Siti logout otomatis (tidak aktif 30 menit)");
    assert_eq!(auto[0].2, "Ibu Siti");

    t.app.teardown().await;
}

#[tokio::test]
async fn test_route_guard_follows_role() {
    let t = TestApp::new().await;
    assert_eq!(
        GuardDecision::evaluate(&t.app.session.state(), Route::Finance),
        GuardDecision::Wait
    );

    t.app.session.restore().await;
    let decision = GuardDecision::evaluate(&t.app.session.state(), Route::Finance);
    assert_eq!(decision, GuardDecision::RedirectToLogin);
    assert_eq!(decision.redirect(t.app.session.config()), Some("/login"));

    t.login_as("bendahara").await;
    let state = t.app.session.state();
    assert_eq!(GuardDecision::evaluate(&state, Route::Tools), GuardDecision::Allow);
    let decision = GuardDecision::evaluate(&state, Route::UserManagement);
    assert_eq!(decision, GuardDecision::Forbidden);
    assert_eq!(decision.redirect(t.app.session.config()), Some("/"));

    t.app.session.logout().await;
    t.login_as("pengasuh").await;
    let state = t.app.session.state();
    assert_eq!(GuardDecision::evaluate(&state, Route::Tools), GuardDecision::Forbidden);
    assert_eq!(
        GuardDecision::evaluate(&state, Route::Disbursement),
        GuardDecision::Allow
    );
}
