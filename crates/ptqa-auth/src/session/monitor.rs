//! Periodic inactivity check.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use ptqa_core::config::session::SessionConfig;

use super::manager::SessionManager;

/// Runs [`SessionManager::check_inactivity`] on a fixed interval until
/// shut down.
#[derive(Debug, Clone)]
pub struct InactivityMonitor {
    manager: Arc<SessionManager>,
    interval: Duration,
}

impl InactivityMonitor {
    /// Creates a monitor using the configured check interval.
    pub fn new(manager: Arc<SessionManager>, config: &SessionConfig) -> Self {
        Self {
            manager,
            interval: Duration::from_secs(config.check_interval_seconds.max(1)),
        }
    }

    /// The check interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the loop. It exits when `shutdown` becomes `true` or its
    /// sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_secs = self.interval.as_secs(), "Inactivity monitor started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if self.manager.check_inactivity().await {
                            debug!("Inactivity monitor ended an idle session");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Inactivity monitor stopped");
        })
    }
}
