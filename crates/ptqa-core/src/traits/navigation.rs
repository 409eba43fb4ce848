//! Navigation collaborator trait.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a navigation request should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// In-app route change that keeps client state.
    Soft,
    /// Full reload of the entry point, dropping client state.
    Hard,
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soft => write!(f, "soft"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Receives redirect requests from the core (logout, auto-logout,
/// notification clicks). Implementations must not block.
pub trait Navigator: Send + Sync + fmt::Debug + 'static {
    /// Request navigation to `route`.
    fn navigate(&self, route: &str, mode: NavigationMode);
}

/// Navigator that remembers every request. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    requests: std::sync::Arc<std::sync::Mutex<Vec<(String, NavigationMode)>>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request so far, oldest first.
    pub fn requests(&self) -> Vec<(String, NavigationMode)> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The most recent request.
    pub fn last(&self) -> Option<(String, NavigationMode)> {
        self.requests().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str, mode: NavigationMode) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((route.to_string(), mode));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_keeps_order() {
        let navigator = RecordingNavigator::new();
        navigator.navigate("/login", NavigationMode::Soft);
        navigator.clone().navigate("/login", NavigationMode::Hard);
        assert_eq!(navigator.requests().len(), 2);
        assert_eq!(navigator.last(), Some(("/login".to_string(), NavigationMode::Hard)));
    }
}
