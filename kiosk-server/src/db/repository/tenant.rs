//! Tenant Repository
//!
//! Two concerns: the singleton active-tenant pointer (last-writer-wins)
//! and the local write-back cache of resolved tenant configurations.
//! Config snapshots are stored as a JSON column; the schema of a tenant
//! config is owned by `shared::models::tenant`.

use super::{RepoError, RepoResult};
use shared::models::TenantConfig;
use sqlx::SqlitePool;

/// Read the active tenant pointer. `None` until first tenant selection.
pub async fn get_current_slug(pool: &SqlitePool) -> RepoResult<Option<String>> {
    let slug: Option<String> =
        sqlx::query_scalar("SELECT slug FROM current_tenant WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(slug)
}

/// Overwrite the active tenant pointer (last-writer-wins).
pub async fn set_current_slug(pool: &SqlitePool, slug: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO current_tenant (id, slug, updated_at) VALUES (1, ?1, ?2) \
         ON CONFLICT(id) DO UPDATE SET slug = excluded.slug, updated_at = excluded.updated_at",
    )
    .bind(slug)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Look up a cached tenant config snapshot by slug.
///
/// A cached row that fails to deserialize is a database-level failure,
/// not a miss — callers must not fall through to lower tiers on it.
pub async fn find_config(pool: &SqlitePool, slug: &str) -> RepoResult<Option<TenantConfig>> {
    let data: Option<String> =
        sqlx::query_scalar("SELECT data FROM tenant_configs WHERE slug = ?")
            .bind(slug)
            .fetch_optional(pool)
            .await?;

    match data {
        Some(json) => {
            let config = serde_json::from_str(&json).map_err(|e| {
                RepoError::Database(format!("Corrupt cached config for '{slug}': {e}"))
            })?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Write back a resolved config snapshot (insert or replace).
pub async fn upsert_config(pool: &SqlitePool, config: &TenantConfig) -> RepoResult<()> {
    let json = serde_json::to_string(config)
        .map_err(|e| RepoError::Validation(format!("Unserializable tenant config: {e}")))?;
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO tenant_configs (slug, data, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(slug) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
    )
    .bind(&config.slug)
    .bind(json)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;

    fn config(slug: &str, name: &str) -> TenantConfig {
        TenantConfig {
            slug: slug.to_string(),
            name: name.to_string(),
            theme: Default::default(),
            welcome_message: None,
        }
    }

    #[tokio::test]
    async fn test_current_slug_last_writer_wins() {
        let pool = test_pool().await;
        assert_eq!(get_current_slug(&pool).await.unwrap(), None);

        set_current_slug(&pool, "acme").await.unwrap();
        set_current_slug(&pool, "globex").await.unwrap();
        assert_eq!(
            get_current_slug(&pool).await.unwrap().as_deref(),
            Some("globex")
        );
    }

    #[tokio::test]
    async fn test_config_roundtrip_and_overwrite() {
        let pool = test_pool().await;
        assert!(find_config(&pool, "acme").await.unwrap().is_none());

        upsert_config(&pool, &config("acme", "Acme Corp")).await.unwrap();
        let cached = find_config(&pool, "acme").await.unwrap().unwrap();
        assert_eq!(cached.name, "Acme Corp");

        upsert_config(&pool, &config("acme", "Acme Events")).await.unwrap();
        let cached = find_config(&pool, "acme").await.unwrap().unwrap();
        assert_eq!(cached.name, "Acme Events");
    }

    #[tokio::test]
    async fn test_corrupt_config_is_an_error_not_a_miss() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO tenant_configs (slug, data, updated_at) VALUES ('bad', '{not json', 0)")
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            find_config(&pool, "bad").await,
            Err(RepoError::Database(_))
        ));
    }
}
