//! Notification event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::NotificationKind;

/// A derived alert. Events are recomputed on every aggregation pass and
/// never stored; only acknowledged ids are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Stable id derived from the source record and kind,
    /// e.g. `expense-<txId>` or `pending-approvals`.
    pub id: String,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// One-line description.
    pub message: String,
    /// When the underlying event happened.
    pub date: DateTime<Utc>,
    /// Route to open when the event is clicked.
    pub link: String,
    /// Whether the id is in the acknowledgement set. Always `false` on raw
    /// events; set when the feed is merged for presentation.
    #[serde(default)]
    pub read: bool,
}

impl NotificationEvent {
    /// Create an unread event.
    pub fn new(
        id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        date: DateTime<Utc>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            date,
            link: link.into(),
            read: false,
        }
    }
}
