//! End-to-end sync behavior: offline capture, drain on reconnect,
//! retry of failed records, single-flight, and dedup on resubmission.

mod common;

use std::sync::Arc;
use std::time::Duration;

use kiosk_server::cloud::RemoteStore;
use kiosk_server::db::repository::lead;
use kiosk_server::sync::{SyncOutcome, SyncService, idempotency_key};
use shared::models::SyncStatus;

use common::{MockRemote, lead_create, test_pool};

#[tokio::test]
async fn test_offline_capture_then_drain_on_reconnect() {
    let pool = test_pool().await;
    let remote = Arc::new(MockRemote::unreachable());
    let service = SyncService::new(pool.clone(), remote.clone());

    // Capture three leads while the remote is down
    for i in 1..=3 {
        lead::insert(
            &pool,
            lead_create(&format!("Visitor {i}"), &format!("v{i}@example.com")),
            "acme",
        )
        .await
        .unwrap();
    }

    // Unreachable: nothing is touched
    assert_eq!(service.run_once().await, SyncOutcome::RemoteUnreachable);
    let stats = lead::stats(&pool).await.unwrap();
    assert_eq!(stats.pending, 3);
    assert_eq!(remote.lead_count(), 0);

    // Back online: the whole backlog drains in one pass
    remote.set_reachable(true);
    assert_eq!(
        service.run_once().await,
        SyncOutcome::Drained {
            synced: 3,
            errors: 0
        }
    );

    let stats = lead::stats(&pool).await.unwrap();
    assert_eq!(stats.synced, 3);
    assert_eq!(stats.pending, 0);
    assert_eq!(remote.lead_count(), 3);

    let sync_stats = service.stats_snapshot().await;
    assert_eq!(sync_stats.total_synced, 3);
    assert_eq!(sync_stats.total_errors, 0);
    assert!(sync_stats.last_sync_time.is_some());
}

#[tokio::test]
async fn test_failed_lead_marked_error_and_retried() {
    let pool = test_pool().await;
    let remote = Arc::new(MockRemote::new());
    let service = SyncService::new(pool.clone(), remote.clone());

    let ok = lead::insert(&pool, lead_create("Ada", "ada@example.com"), "acme")
        .await
        .unwrap();
    let bad = lead::insert(&pool, lead_create("Bob", "bob@example.com"), "acme")
        .await
        .unwrap();

    remote.fail_lead(bad.id);

    // One succeeds, one fails; the failure does not abort the batch
    assert_eq!(
        service.run_once().await,
        SyncOutcome::Drained {
            synced: 1,
            errors: 1
        }
    );

    let failed = lead::find_by_id(&pool, bad.id).await.unwrap().unwrap();
    assert_eq!(failed.sync_status, SyncStatus::Error);
    assert!(failed.error_message.is_some());

    let synced = lead::find_by_id(&pool, ok.id).await.unwrap().unwrap();
    assert_eq!(synced.sync_status, SyncStatus::Synced);

    // ERROR records stay eligible: the next pass retries and succeeds
    remote.clear_lead_failures();
    assert_eq!(
        service.run_once().await,
        SyncOutcome::Drained {
            synced: 1,
            errors: 0
        }
    );

    let retried = lead::find_by_id(&pool, bad.id).await.unwrap().unwrap();
    assert_eq!(retried.sync_status, SyncStatus::Synced);
    assert_eq!(remote.lead_count(), 2);

    let sync_stats = service.stats_snapshot().await;
    assert_eq!(sync_stats.total_synced, 2);
    assert_eq!(sync_stats.total_errors, 1);
}

#[tokio::test]
async fn test_resubmission_after_crash_deduplicates() {
    let pool = test_pool().await;
    let remote = Arc::new(MockRemote::new());
    let service = SyncService::new(pool.clone(), remote.clone());

    let record = lead::insert(&pool, lead_create("Ada", "ada@example.com"), "acme")
        .await
        .unwrap();

    // Simulate a crash after the remote accepted the lead but before the
    // local SYNCED mark: the record was submitted once already.
    let key = idempotency_key(&record);
    remote.create_lead(&record, &key).await.unwrap();
    assert_eq!(remote.lead_count(), 1);

    // The restarted worker sees the record still pending and resubmits
    // under the same key; the remote deduplicates.
    assert_eq!(
        service.run_once().await,
        SyncOutcome::Drained {
            synced: 1,
            errors: 0
        }
    );
    assert_eq!(remote.lead_count(), 1);

    let record = lead::find_by_id(&pool, record.id).await.unwrap().unwrap();
    assert_eq!(record.sync_status, SyncStatus::Synced);
}

#[tokio::test]
async fn test_concurrent_trigger_is_single_flight() {
    let pool = test_pool().await;
    let remote = Arc::new(MockRemote::new());
    let service = Arc::new(SyncService::new(pool.clone(), remote.clone()));

    lead::insert(&pool, lead_create("Ada", "ada@example.com"), "acme")
        .await
        .unwrap();

    // Hold the first pass in flight inside the connectivity probe
    remote.set_ping_delay(Duration::from_millis(200));

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.run_once().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Second trigger while the first is in flight: merged away
    assert_eq!(service.run_once().await, SyncOutcome::AlreadyRunning);

    assert_eq!(
        first.await.unwrap(),
        SyncOutcome::Drained {
            synced: 1,
            errors: 0
        }
    );

    // After the flight finishes the guard is released again
    remote.set_ping_delay(Duration::ZERO);
    assert_eq!(
        service.run_once().await,
        SyncOutcome::Drained {
            synced: 0,
            errors: 0
        }
    );
}

#[tokio::test]
async fn test_empty_queue_pass_still_updates_last_sync_time() {
    let pool = test_pool().await;
    let remote = Arc::new(MockRemote::new());
    let service = SyncService::new(pool, remote);

    assert_eq!(
        service.run_once().await,
        SyncOutcome::Drained {
            synced: 0,
            errors: 0
        }
    );

    let stats = service.stats_snapshot().await;
    assert_eq!(stats.total_synced, 0);
    assert!(stats.last_sync_time.is_some());
}
