//! The notification feed: raw events merged with read state.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use ptqa_core::error::AppError;
use ptqa_core::result::AppResult;
use ptqa_core::traits::navigation::{NavigationMode, Navigator};
use ptqa_entity::notification::{NotificationEvent, NotificationKind};
use ptqa_entity::user::Principal;

use super::aggregator::{NotificationAggregator, sort_newest_first};
use super::read_ack::ReadAckStore;

/// Which events a feed view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedFilter {
    /// Every event.
    #[default]
    All,
    /// Events not yet acknowledged.
    Unread,
    /// Events of one kind.
    Kind(NotificationKind),
}

impl FeedFilter {
    fn accepts(&self, event: &NotificationEvent) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !event.read,
            Self::Kind(kind) => event.kind == *kind,
        }
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Unread => write!(f, "unread"),
            Self::Kind(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for FeedFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            other => other.parse::<NotificationKind>().map(Self::Kind),
        }
    }
}

/// Holds the latest raw events and answers presentation queries.
///
/// Read flags are never cached: every view re-reads the acknowledgement
/// set, so acknowledgements made elsewhere show up on the next view.
#[derive(Debug)]
pub struct NotificationFeed {
    /// Produces raw events.
    aggregator: NotificationAggregator,
    /// Persisted acknowledgements.
    read_acks: ReadAckStore,
    /// Target of `open`.
    navigator: Arc<dyn Navigator>,
    /// Events of the latest pass, newest first.
    raw: RwLock<Vec<NotificationEvent>>,
    /// Bumped whenever the raw list or read set changes.
    revision: watch::Sender<u64>,
}

impl NotificationFeed {
    /// Creates an empty feed.
    pub fn new(
        aggregator: NotificationAggregator,
        read_acks: ReadAckStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            aggregator,
            read_acks,
            navigator,
            raw: RwLock::new(Vec::new()),
            revision,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Re-run aggregation for `principal` and replace the raw list wholesale.
    /// Returns the number of events.
    pub async fn refresh(&self, principal: &Principal) -> usize {
        let events = self.aggregator.run(principal).await;
        let count = events.len();
        *self.raw.write().await = events;
        self.bump();
        count
    }

    /// Drop every raw event.
    pub async fn clear(&self) {
        let mut raw = self.raw.write().await;
        if !raw.is_empty() {
            raw.clear();
            drop(raw);
            self.bump();
        }
    }

    /// The feed with read flags applied, newest first.
    pub async fn items(&self) -> Vec<NotificationEvent> {
        let read = self.read_acks.load().await;
        let mut items: Vec<NotificationEvent> = self
            .raw
            .read()
            .await
            .iter()
            .cloned()
            .map(|mut event| {
                event.read = read.contains(&event.id);
                event
            })
            .collect();
        sort_newest_first(&mut items);
        items
    }

    /// The feed restricted by `filter`.
    pub async fn filtered(&self, filter: FeedFilter) -> Vec<NotificationEvent> {
        self.items()
            .await
            .into_iter()
            .filter(|e| filter.accepts(e))
            .collect()
    }

    /// Number of unread events.
    pub async fn unread_count(&self) -> usize {
        self.items().await.iter().filter(|e| !e.read).count()
    }

    /// Acknowledge one event id.
    pub async fn mark_read(&self, id: &str) -> AppResult<()> {
        if self.read_acks.mark_read(id).await? {
            debug!(id, "Notification marked read");
            self.bump();
        }
        Ok(())
    }

    /// Acknowledge every event currently in the feed.
    pub async fn mark_all_read(&self) -> AppResult<()> {
        let ids: Vec<String> = self.raw.read().await.iter().map(|e| e.id.clone()).collect();
        self.read_acks.mark_all_read(ids).await?;
        self.bump();
        Ok(())
    }

    /// Acknowledge an event and navigate to its target route.
    pub async fn open(&self, id: &str) -> AppResult<NotificationEvent> {
        let event = self
            .raw
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Notification '{id}' not found")))?;

        self.mark_read(id).await?;
        info!(id, link = %event.link, "Opening notification");
        self.navigator.navigate(&event.link, NavigationMode::Soft);

        Ok(NotificationEvent { read: true, ..event })
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r = r.wrapping_add(1));
    }
}
