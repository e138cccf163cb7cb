// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM stop the accept loop; the process then exits 0.

use crate::logger;

/// Resolve when the process is asked to stop
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigint, mut sigterm) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!("Failed to register signal handlers: {e}"));
                return std::future::pending().await;
            }
        };

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
