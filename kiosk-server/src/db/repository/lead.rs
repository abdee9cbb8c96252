//! Lead Repository
//!
//! The durable lead queue. Inserts happen at capture time (local-only
//! transaction), status transitions happen only in the sync worker.
//! Records are never deleted here; retention is an external concern.

use super::{RepoError, RepoResult};
use shared::models::{LeadCreate, LeadRecord, LeadStats};
use sqlx::SqlitePool;
use validator::Validate;

const LEAD_COLUMNS: &str =
    "id, name, email, phone, tenant_slug, created_at, sync_status, synced_at, error_message";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LeadRecord>> {
    let lead = sqlx::query_as::<_, LeadRecord>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(lead)
}

/// Insert a captured lead. Fails only on malformed input — never on
/// connectivity. New records always start as `PENDING`.
pub async fn insert(
    pool: &SqlitePool,
    data: LeadCreate,
    tenant_slug: &str,
) -> RepoResult<LeadRecord> {
    data.validate()
        .map_err(|e| RepoError::Validation(e.to_string()))?;
    if tenant_slug.is_empty() {
        return Err(RepoError::Validation("tenant_slug must not be empty".into()));
    }

    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO leads (name, email, phone, tenant_slug, created_at, sync_status) \
         VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING') RETURNING id",
    )
    .bind(data.name.trim())
    .bind(data.email.trim())
    .bind(&data.phone)
    .bind(tenant_slug)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create lead".into()))
}

/// All records still eligible for upload, oldest first.
///
/// `ERROR` rows stay in the eligible set: a transient remote failure must
/// not strand a captured lead.
pub async fn list_pending(pool: &SqlitePool) -> RepoResult<Vec<LeadRecord>> {
    let leads = sqlx::query_as::<_, LeadRecord>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE sync_status IN ('PENDING', 'ERROR') ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(leads)
}

/// Mark a record as uploaded. Idempotent: a second call on an already
/// `SYNCED` record is a no-op `Ok`.
pub async fn mark_synced(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE leads SET sync_status = 'SYNCED', synced_at = ?1, error_message = NULL \
         WHERE id = ?2 AND sync_status <> 'SYNCED'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 && find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Lead {id} not found")));
    }
    Ok(())
}

/// Record an upload failure. Never demotes a `SYNCED` record — a crash
/// between remote success and the local mark must not resurrect the row
/// into an error state.
pub async fn mark_error(pool: &SqlitePool, id: i64, message: &str) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE leads SET sync_status = 'ERROR', error_message = ?1 \
         WHERE id = ?2 AND sync_status <> 'SYNCED'",
    )
    .bind(message)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 && find_by_id(pool, id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Lead {id} not found")));
    }
    Ok(())
}

/// Per-status counts for the admin stats endpoint.
pub async fn stats(pool: &SqlitePool) -> RepoResult<LeadStats> {
    let row: (i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), \
                COALESCE(SUM(sync_status = 'PENDING'), 0), \
                COALESCE(SUM(sync_status = 'SYNCED'), 0), \
                COALESCE(SUM(sync_status = 'ERROR'), 0) \
         FROM leads",
    )
    .fetch_one(pool)
    .await?;

    Ok(LeadStats {
        total: row.0,
        pending: row.1,
        synced: row.2,
        error: row.3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;
    use shared::models::SyncStatus;

    fn lead(name: &str, email: &str) -> LeadCreate {
        LeadCreate {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_insert_starts_pending() {
        let pool = test_pool().await;
        let rec = insert(&pool, lead("Ada Lovelace", "ada@example.com"), "acme")
            .await
            .expect("insert should succeed");

        assert_eq!(rec.sync_status, SyncStatus::Pending);
        assert_eq!(rec.tenant_slug, "acme");
        assert!(rec.synced_at.is_none());
        assert!(rec.error_message.is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_input() {
        let pool = test_pool().await;

        let err = insert(&pool, lead("", "ada@example.com"), "acme").await;
        assert!(matches!(err, Err(RepoError::Validation(_))));

        let err = insert(&pool, lead("Ada", "not-an-email"), "acme").await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_pending_insertion_order() {
        let pool = test_pool().await;
        for i in 0..3 {
            insert(&pool, lead(&format!("Visitor {i}"), "v@example.com"), "acme")
                .await
                .unwrap();
        }

        let pending = list_pending(&pool).await.unwrap();
        assert_eq!(pending.len(), 3);
        assert!(pending.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_mark_synced_idempotent() {
        let pool = test_pool().await;
        let rec = insert(&pool, lead("Ada", "ada@example.com"), "acme")
            .await
            .unwrap();

        mark_synced(&pool, rec.id).await.unwrap();
        let first = find_by_id(&pool, rec.id).await.unwrap().unwrap();
        assert_eq!(first.sync_status, SyncStatus::Synced);

        // Second call is a no-op, not an error
        mark_synced(&pool, rec.id).await.unwrap();
        let second = find_by_id(&pool, rec.id).await.unwrap().unwrap();
        assert_eq!(second.synced_at, first.synced_at);
    }

    #[tokio::test]
    async fn test_mark_error_keeps_record_retryable() {
        let pool = test_pool().await;
        let rec = insert(&pool, lead("Ada", "ada@example.com"), "acme")
            .await
            .unwrap();

        mark_error(&pool, rec.id, "remote store unreachable")
            .await
            .unwrap();
        let stored = find_by_id(&pool, rec.id).await.unwrap().unwrap();
        assert_eq!(stored.sync_status, SyncStatus::Error);
        assert_eq!(
            stored.error_message.as_deref(),
            Some("remote store unreachable")
        );

        // ERROR rows remain in the pending-eligible set
        let pending = list_pending(&pool).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_error_never_demotes_synced() {
        let pool = test_pool().await;
        let rec = insert(&pool, lead("Ada", "ada@example.com"), "acme")
            .await
            .unwrap();

        mark_synced(&pool, rec.id).await.unwrap();
        mark_error(&pool, rec.id, "late failure").await.unwrap();

        let stored = find_by_id(&pool, rec.id).await.unwrap().unwrap();
        assert_eq!(stored.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn test_mark_unknown_id_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            mark_synced(&pool, 999).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let pool = test_pool().await;
        let a = insert(&pool, lead("A", "a@example.com"), "acme").await.unwrap();
        let b = insert(&pool, lead("B", "b@example.com"), "acme").await.unwrap();
        insert(&pool, lead("C", "c@example.com"), "acme").await.unwrap();

        mark_synced(&pool, a.id).await.unwrap();
        mark_error(&pool, b.id, "boom").await.unwrap();

        let s = stats(&pool).await.unwrap();
        assert_eq!(s.total, 3);
        assert_eq!(s.pending, 1);
        assert_eq!(s.synced, 1);
        assert_eq!(s.error, 1);
    }
}
