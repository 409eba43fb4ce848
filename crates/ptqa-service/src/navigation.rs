//! Navigator for hosts without a router.

use tracing::info;

use ptqa_core::traits::navigation::{NavigationMode, Navigator};

/// Logs redirect requests instead of acting on them. Used by the daemon
/// and the CLI, where there is no screen to navigate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str, mode: NavigationMode) {
        info!(route, %mode, "Navigation requested");
    }
}
