//! Derived notification feed: rules, aggregation, read state and polling.

pub mod aggregator;
pub mod feed;
pub mod poller;
pub mod read_ack;
pub mod rules;

pub use aggregator::NotificationAggregator;
pub use feed::{FeedFilter, NotificationFeed};
pub use poller::NotificationPoller;
pub use read_ack::ReadAckStore;
pub use rules::NotificationRules;
