//! Signal handling and graceful shutdown (spec §5 "Cancellation &
//! timeouts": "cancellation at the input boundary propagates to all
//! in-flight step tasks").
//!
//! Wraps [`canvas_runtime::CancellationToken`] with SIGTERM/SIGINT/SIGHUP
//! wiring (Unix) or Ctrl-C (everywhere else), plus a bounded grace period.

use std::time::Duration;

use canvas_runtime::CancellationToken;

pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 5;

#[derive(Clone)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    grace_period: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        Self { token: CancellationToken::new(), grace_period }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn initiate_shutdown(&self) {
        tracing::info!("initiating graceful shutdown (grace period: {:?})", self.grace_period);
        self.token.cancel();
    }

    /// Waits for the token to be cancelled, then for the grace period to
    /// elapse, whichever a caller's own tasks require — this just blocks
    /// until cancellation is observed; callers race their own cleanup
    /// against `grace_period` themselves via `tokio::time::timeout`.
    pub async fn wait_for_shutdown(&self) {
        self.token.cancelled().await;
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_GRACE_PERIOD_SECS))
    }
}

/// Installs OS signal handlers that cancel `coordinator`'s token. On Unix,
/// listens for SIGTERM, SIGINT, and SIGHUP; elsewhere, falls back to
/// `tokio::signal::ctrl_c`.
pub async fn wait_for_signal(coordinator: &ShutdownCoordinator) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGHUP handler");
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM"),
            _ = sighup.recv() => tracing::info!("received SIGHUP"),
            _ = tokio::signal::ctrl_c() => tracing::info!("received SIGINT"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received ctrl-c");
    }
    coordinator.initiate_shutdown();
}
