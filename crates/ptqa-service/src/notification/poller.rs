//! Fixed-interval re-aggregation while a principal is present.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use ptqa_auth::session::SessionState;
use ptqa_core::config::notification::NotificationConfig;
use ptqa_entity::user::Principal;

use super::feed::NotificationFeed;

/// Follows the session state: refreshes the feed as soon as a principal
/// appears and then every interval, and empties it when the principal is
/// cleared.
#[derive(Debug, Clone)]
pub struct NotificationPoller {
    feed: Arc<NotificationFeed>,
    interval: Duration,
}

enum Wake {
    SessionChanged,
    Stop,
}

impl NotificationPoller {
    /// Creates a poller using the configured interval.
    pub fn new(feed: Arc<NotificationFeed>, config: &NotificationConfig) -> Self {
        Self {
            feed,
            interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
        }
    }

    /// Start polling. The task exits when `shutdown` becomes `true` or
    /// either sender is dropped.
    pub fn spawn(
        self,
        mut session: watch::Receiver<SessionState>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "Notification poller started");

            loop {
                let principal = session.borrow_and_update().principal().cloned();
                let wake = match principal {
                    Some(principal) => self.poll(&principal, &mut session, &mut shutdown).await,
                    None => {
                        self.feed.clear().await;
                        wait(&mut session, &mut shutdown).await
                    }
                };
                if let Wake::Stop = wake {
                    break;
                }
            }

            info!("Notification poller stopped");
        })
    }

    async fn poll(
        &self,
        principal: &Principal,
        session: &mut watch::Receiver<SessionState>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Wake {
        let count = self.feed.refresh(principal).await;
        debug!(user = %principal.username, count, "Notification feed refreshed");

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let count = self.feed.refresh(principal).await;
                    debug!(user = %principal.username, count, "Notification feed refreshed");
                }
                wake = wait(session, shutdown) => return wake,
            }
        }
    }
}

async fn wait(
    session: &mut watch::Receiver<SessionState>,
    shutdown: &mut watch::Receiver<bool>,
) -> Wake {
    loop {
        tokio::select! {
            changed = session.changed() => {
                return match changed {
                    Ok(()) => Wake::SessionChanged,
                    Err(_) => Wake::Stop,
                };
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return Wake::Stop;
                }
            }
        }
    }
}
