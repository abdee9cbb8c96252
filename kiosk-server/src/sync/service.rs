//! SyncService — single-flight drain of the pending lead queue
//!
//! One run: probe connectivity, list pending records, submit each in
//! insertion order, mark each `SYNCED`/`ERROR` individually, then persist
//! aggregate stats. A concurrent trigger while a run is in flight is a
//! silent no-op; the next scheduled tick picks up anything missed.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::cloud::RemoteStore;
use crate::db::repository::lead;
use shared::models::{LeadRecord, SyncStats};

/// Result of one `run_once` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Another run was already in flight; nothing was done.
    AlreadyRunning,
    /// Connectivity probe failed; no records were touched.
    RemoteUnreachable,
    /// The pending set was drained (possibly empty).
    Drained { synced: u64, errors: u64 },
}

/// Deterministic dedup key for one local record.
///
/// Stable across retries and restarts, so a crash between remote success
/// and the local `SYNCED` mark resubmits under the same key and the
/// remote store deduplicates instead of double-counting the lead.
pub fn idempotency_key(record: &LeadRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.id.to_le_bytes());
    hasher.update(b":");
    hasher.update(record.tenant_slug.as_bytes());
    hasher.update(b":");
    hasher.update(record.created_at.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// Releases the single-flight guard on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SyncService {
    pool: SqlitePool,
    remote: Arc<dyn RemoteStore>,
    running: AtomicBool,
    stats: RwLock<SyncStats>,
}

impl SyncService {
    pub fn new(pool: SqlitePool, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            pool,
            remote,
            running: AtomicBool::new(false),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Current aggregate stats snapshot.
    pub async fn stats_snapshot(&self) -> SyncStats {
        self.stats.read().await.clone()
    }

    /// Execute one sync pass. Single-flight: the guard is an atomic
    /// compare-and-set because runs can be triggered concurrently from
    /// the scheduled tick and the manual trigger endpoint.
    pub async fn run_once(&self) -> SyncOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Sync already in flight, trigger ignored");
            return SyncOutcome::AlreadyRunning;
        }
        let _guard = FlightGuard(&self.running);

        // 1. Connectivity probe — on failure, leave every record untouched
        if let Err(e) = self.remote.ping().await {
            tracing::info!("Remote store unreachable, skipping sync: {e}");
            return SyncOutcome::RemoteUnreachable;
        }

        // 2. Fetch the pending set (insertion order, oldest first)
        let pending = match lead::list_pending(&self.pool).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to list pending leads: {e}");
                let mut stats = self.stats.write().await;
                stats.last_error = Some(e.to_string());
                return SyncOutcome::Drained { synced: 0, errors: 0 };
            }
        };

        if pending.is_empty() {
            let mut stats = self.stats.write().await;
            stats.last_sync_time = Some(shared::util::now_millis());
            return SyncOutcome::Drained { synced: 0, errors: 0 };
        }

        // 3. Drain in order; one record's failure never aborts the batch
        let total = pending.len();
        let mut synced: u64 = 0;
        let mut errors: u64 = 0;
        let mut last_error: Option<String> = None;

        for record in pending {
            let key = idempotency_key(&record);
            match self.remote.create_lead(&record, &key).await {
                Ok(()) => {
                    if let Err(e) = lead::mark_synced(&self.pool, record.id).await {
                        tracing::error!(lead = record.id, "Failed to mark lead synced: {e}");
                        errors += 1;
                        last_error = Some(e.to_string());
                    } else {
                        synced += 1;
                    }
                }
                Err(e) => {
                    let reason = e.to_string();
                    tracing::warn!(lead = record.id, "Lead upload failed: {reason}");
                    if let Err(mark_err) =
                        lead::mark_error(&self.pool, record.id, &reason).await
                    {
                        tracing::error!(lead = record.id, "Failed to mark lead error: {mark_err}");
                    }
                    errors += 1;
                    last_error = Some(reason);
                }
            }
        }

        // 4. Persist aggregate stats for observability
        {
            let mut stats = self.stats.write().await;
            stats.total_synced += synced;
            stats.total_errors += errors;
            if last_error.is_some() {
                stats.last_error = last_error;
            }
            stats.last_sync_time = Some(shared::util::now_millis());
        }

        tracing::info!(total, synced, errors, "Sync pass complete");
        SyncOutcome::Drained { synced, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_key_deterministic() {
        let record = LeadRecord {
            id: 42,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            tenant_slug: "acme".into(),
            created_at: 1_700_000_000_000,
            sync_status: shared::models::SyncStatus::Pending,
            synced_at: None,
            error_message: None,
        };

        let a = idempotency_key(&record);
        let b = idempotency_key(&record);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let mut other = record.clone();
        other.id = 43;
        assert_ne!(a, idempotency_key(&other));
    }
}
