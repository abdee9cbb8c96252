//! SyncWorker — background schedule for the sync service
//!
//! Runs once shortly after startup (leads captured while the kiosk was
//! off should not wait a full interval), then on a fixed tick. The ticker
//! is owned here and stops with the task's cancellation token; there is
//! no process-global scheduling state.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{SyncOutcome, SyncService};

/// Delay before the post-startup run
const STARTUP_DELAY_SECS: u64 = 3;

pub struct SyncWorker {
    service: Arc<SyncService>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl SyncWorker {
    pub fn new(service: Arc<SyncService>, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            service,
            interval,
            shutdown,
        }
    }

    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "SyncWorker started");

        // Startup run, cancellable during the delay
        tokio::select! {
            _ = self.shutdown.cancelled() => {
                tracing::info!("SyncWorker shutting down before first run");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(STARTUP_DELAY_SECS)) => {
                self.run_and_log().await;
            }
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_and_log().await;
                }
            }
        }

        tracing::info!("SyncWorker stopped");
    }

    async fn run_and_log(&self) {
        match self.service.run_once().await {
            SyncOutcome::Drained { synced, errors } if synced > 0 || errors > 0 => {
                tracing::info!(synced, errors, "Scheduled sync drained pending leads");
            }
            SyncOutcome::Drained { .. } => {
                tracing::debug!("Scheduled sync: nothing pending");
            }
            SyncOutcome::RemoteUnreachable => {
                tracing::debug!("Scheduled sync skipped: remote unreachable");
            }
            SyncOutcome::AlreadyRunning => {
                tracing::debug!("Scheduled sync skipped: run already in flight");
            }
        }
    }
}
