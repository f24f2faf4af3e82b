//! Shutdown signal handling
//!
//! [`shutdown_signal`] resolves on the first of Ctrl+C, SIGINT, SIGTERM or
//! SIGHUP. The server stops accepting connections when it resolves and then
//! closes the database pool.

use tracing::{info, warn};

/// Which signal ended the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl+C from a terminal
    CtrlC,
    /// SIGTERM, e.g. from a supervisor
    Terminate,
    /// SIGINT delivered directly
    Interrupt,
    /// SIGHUP
    Hangup,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::CtrlC => write!(f, "Ctrl+C"),
            ShutdownReason::Terminate => write!(f, "SIGTERM"),
            ShutdownReason::Interrupt => write!(f, "SIGINT"),
            ShutdownReason::Hangup => write!(f, "SIGHUP"),
        }
    }
}

/// Wait for a shutdown signal
///
/// A handler that cannot be installed is logged and treated as never firing,
/// so the remaining signals still work.
pub async fn shutdown_signal() -> ShutdownReason {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ShutdownReason::CtrlC,
            Err(err) => {
                warn!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        async fn wait(kind: SignalKind, reason: ShutdownReason) -> ShutdownReason {
            match signal(kind) {
                Ok(mut stream) => {
                    stream.recv().await;
                    reason
                }
                Err(err) => {
                    warn!(error = %err, signal = %reason, "failed to install signal handler");
                    std::future::pending().await
                }
            }
        }

        tokio::select! {
            reason = wait(SignalKind::terminate(), ShutdownReason::Terminate) => reason,
            reason = wait(SignalKind::interrupt(), ShutdownReason::Interrupt) => reason,
            reason = wait(SignalKind::hangup(), ShutdownReason::Hangup) => reason,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<ShutdownReason>();

    let reason = tokio::select! {
        reason = ctrl_c => reason,
        reason = terminate => reason,
    };

    info!(signal = %reason, "shutdown signal received");
    reason
}
