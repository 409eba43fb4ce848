//! One aggregation pass over every notification rule.

use std::sync::Arc;

use tracing::{debug, warn};

use ptqa_auth::rbac::CapabilitySet;
use ptqa_core::result::AppResult;
use ptqa_core::traits::clock::Clock;
use ptqa_entity::notification::NotificationEvent;
use ptqa_entity::user::Principal;

use super::rules::NotificationRules;

/// Runs the rules for a principal and merges their events.
#[derive(Debug, Clone)]
pub struct NotificationAggregator {
    /// The rule queries.
    rules: NotificationRules,
    /// Time source for the rolling windows.
    clock: Arc<dyn Clock>,
}

impl NotificationAggregator {
    /// Creates a new aggregator.
    pub fn new(rules: NotificationRules, clock: Arc<dyn Clock>) -> Self {
        Self { rules, clock }
    }

    /// Produce the raw event list for `principal`, newest first.
    ///
    /// The four rule queries run concurrently. A failed query contributes
    /// no events. Events are concatenated in rule order before a stable
    /// sort, so equal timestamps keep that order whatever the completion
    /// order of the queries.
    pub async fn run(&self, principal: &Principal) -> Vec<NotificationEvent> {
        let caps = CapabilitySet::for_role(principal.role);
        let now = self.clock.now();

        let (expenses, overdue, pending, decisions) = tokio::join!(
            self.rules.large_expenses(now),
            self.rules.overdue_bills(now),
            async {
                if caps.can_approve() {
                    self.rules.pending_approvals(now).await
                } else {
                    Ok(Vec::new())
                }
            },
            async {
                if caps.can_manage_budget() {
                    self.rules.budget_decisions(now).await
                } else {
                    Ok(Vec::new())
                }
            },
        );

        let mut events = Vec::new();
        for (step, result) in [
            ("large_expenses", expenses),
            ("overdue_bills", overdue),
            ("pending_approvals", pending),
            ("budget_decisions", decisions),
        ] {
            collect_step(step, result, &mut events);
        }

        sort_newest_first(&mut events);
        debug!(user = %principal.username, count = events.len(), "Notifications aggregated");
        events
    }
}

fn collect_step(step: &str, result: AppResult<Vec<NotificationEvent>>, events: &mut Vec<NotificationEvent>) {
    match result {
        Ok(mut step_events) => events.append(&mut step_events),
        Err(e) => warn!(step, error = %e, "Notification step failed; skipping"),
    }
}

/// Sort by date descending. Stable, so ties keep their relative order.
pub fn sort_newest_first(events: &mut [NotificationEvent]) {
    events.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use ptqa_entity::notification::NotificationKind;

    use super::*;

    fn event(id: &str, minutes_ago: i64) -> NotificationEvent {
        NotificationEvent::new(
            id,
            NotificationKind::Expense,
            "t",
            "m",
            Utc::now() - Duration::minutes(minutes_ago),
            "/",
        )
    }

    #[test]
    fn test_sort_is_descending() {
        let mut events = vec![event("t1", 1), event("t3", 3), event("t2", 2)];
        sort_newest_first(&mut events);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["t1", "t2", "t3"]);
    }

    #[test]
    fn test_sort_keeps_ties_in_rule_order() {
        let now = Utc::now();
        let mut a = event("expense-1", 0);
        let mut b = event("overdue-1", 0);
        let mut c = event("pending-approvals", 0);
        a.date = now;
        b.date = now;
        c.date = now;
        let mut events = vec![a, b, c];
        sort_newest_first(&mut events);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["expense-1", "overdue-1", "pending-approvals"]);
    }
}
