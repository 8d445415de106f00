// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown notification shared between the signal task and the accept loop
#[derive(Debug, Default)]
pub struct SignalHandler {
    pub shutdown: Notify,
}

impl SignalHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wake the accept loop
    pub fn request_shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Start signal handlers (Unix)
///
/// Registration failures are logged and leave the server running without
/// that signal.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::task::spawn_local(async move {
        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_error(&format!("Failed to register signal handlers: {e}"));
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("SIGTERM received, shutting down"),
            _ = sigint.recv() => tracing::info!("SIGINT received, shutting down"),
        }
        handler.request_shutdown();
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::task::spawn_local(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("Ctrl+C received, shutting down");
            handler.request_shutdown();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_shutdown_wakes_waiter() {
        let handler = SignalHandler::new();
        handler.request_shutdown();
        // notify_one stores a permit when nobody is waiting yet
        let woke = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            handler.shutdown.notified(),
        )
        .await;
        assert!(woke.is_ok());
    }
}
