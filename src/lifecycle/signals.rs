//! OS signal handling.
//!
//! SIGINT and SIGTERM trigger a graceful stop of the reconciliation loop.
//! The proxy child keeps running; it is not ours to stop.

use crate::lifecycle::Shutdown;

/// Wait for SIGINT/SIGTERM and trigger `shutdown`.
///
/// Returns early if shutdown was triggered by something else.
pub async fn listen(shutdown: Shutdown) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, stopping reconciliation loop");
        }
        _ = terminate() => {
            tracing::info!("SIGTERM received, stopping reconciliation loop");
        }
        _ = shutdown.wait() => return,
    }
    shutdown.trigger();
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
