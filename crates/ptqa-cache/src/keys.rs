//! Storage keys for every value the dashboard persists.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Serialized principal of the current session.
pub const AUTH_USER: &str = "auth_user";

/// Epoch milliseconds of the last tracked activity.
pub const LAST_ACTIVITY: &str = "last_activity";

/// JSON array of acknowledged notification ids. Survives logout.
pub const READ_NOTIFICATION_IDS: &str = "read_notification_ids";

/// Keys cleared on logout and on session expiry.
pub const SESSION_KEYS: [&str; 2] = [AUTH_USER, LAST_ACTIVITY];

/// Last-known-good rows of a collection query.
pub fn collection_snapshot(query_key: &str) -> String {
    format!("collection:{query_key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_set_is_not_a_session_key() {
        assert!(!SESSION_KEYS.contains(&READ_NOTIFICATION_IDS));
        assert_eq!(collection_snapshot("users"), "collection:users");
    }
}
