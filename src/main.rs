//! PTQA Dashboard: pesantren finance dashboard core
//!
//! Main entry point: wires all crates together, keeps the session and the
//! notification feed alive, and shuts down on Ctrl-C or SIGTERM.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use ptqa_core::config::AppConfig;
use ptqa_core::error::AppError;
use ptqa_service::{Application, LogNavigator};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Dashboard error");
        std::process::exit(1);
    }
}

/// Load configuration from the config directory and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("PTQA_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("PTQA_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Run until a shutdown signal arrives
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting PTQA dashboard");

    let app = Arc::new(Application::init(config, Arc::new(LogNavigator)).await?);

    // ── Log the feed as it changes ───────────────────────────────
    let mut revisions = app.feed.subscribe();
    let feed_app = Arc::clone(&app);
    let feed_logger = tokio::spawn(async move {
        while revisions.changed().await.is_ok() {
            let items = feed_app.feed.items().await;
            let unread = items.iter().filter(|e| !e.read).count();
            tracing::info!(total = items.len(), unread, "Notification feed updated");
            for event in items.iter().filter(|e| !e.read) {
                tracing::debug!(
                    id = %event.id,
                    kind = %event.kind,
                    title = %event.title,
                    message = %event.message,
                    "Unread notification"
                );
            }
        }
    });

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    app.teardown().await;
    feed_logger.abort();

    Ok(())
}

/// Wait for Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
