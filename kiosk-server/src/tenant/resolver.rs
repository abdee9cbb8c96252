//! TenantResolver — ordered fallback over explicit tiers
//!
//! Each tier is attempted only when the previous one cleanly reports
//! "not found". A malformed remote response is a failure and propagates;
//! a network-level failure (unreachable, timeout) degrades to the next
//! tier, because offline startup is the whole point of the lower tiers.
//! Write-back to the local cache is best-effort and only logged.

use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

use super::defaults;
use crate::cloud::{RemoteError, RemoteStore};
use crate::db::repository::{RepoError, tenant};
use shared::models::TenantConfig;

#[derive(Debug, Error)]
pub enum TenantResolutionError {
    #[error("Tenant '{0}' not found in any tier")]
    NotFound(String),

    /// Local store failure — fatal to the operation, the kiosk cannot
    /// function without local storage.
    #[error("Local store error: {0}")]
    Local(#[from] RepoError),

    /// Non-network remote failure (malformed response, explicit reject).
    #[error("Remote store error: {0}")]
    Remote(RemoteError),
}

pub struct TenantResolver {
    pool: SqlitePool,
    remote: Arc<dyn RemoteStore>,
    bundled: Vec<TenantConfig>,
}

impl TenantResolver {
    pub fn new(pool: SqlitePool, remote: Arc<dyn RemoteStore>) -> Self {
        Self::with_defaults(pool, remote, defaults::bundled_defaults().to_vec())
    }

    /// Construct with an explicit defaults tier (tests script this).
    pub fn with_defaults(
        pool: SqlitePool,
        remote: Arc<dyn RemoteStore>,
        bundled: Vec<TenantConfig>,
    ) -> Self {
        Self {
            pool,
            remote,
            bundled,
        }
    }

    /// Resolve a tenant configuration by slug.
    pub async fn resolve(&self, slug: &str) -> Result<TenantConfig, TenantResolutionError> {
        // Tier 1: local cache
        if let Some(config) = tenant::find_config(&self.pool, slug).await? {
            tracing::debug!(%slug, "Tenant resolved from local cache");
            return Ok(config);
        }

        // Tier 2: remote store, freshest data when reachable
        match self.remote.fetch_tenant(slug).await {
            Ok(Some(config)) => {
                tracing::info!(%slug, "Tenant resolved from remote store");
                self.write_back(&config).await;
                return Ok(config);
            }
            Ok(None) => {}
            Err(e) if e.is_network() => {
                tracing::warn!(%slug, "Remote store unreachable during tenant resolution: {e}");
            }
            Err(e) => return Err(TenantResolutionError::Remote(e)),
        }

        // Tier 3: bundled static defaults
        if let Some(config) = self.bundled.iter().find(|c| c.slug == slug) {
            tracing::info!(%slug, "Tenant resolved from bundled defaults");
            let config = config.clone();
            self.write_back(&config).await;
            return Ok(config);
        }

        Err(TenantResolutionError::NotFound(slug.to_string()))
    }

    /// Best-effort write-back; failure is an observability concern, not
    /// a resolution failure.
    async fn write_back(&self, config: &TenantConfig) {
        if let Err(e) = tenant::upsert_config(&self.pool, config).await {
            tracing::warn!(slug = %config.slug, "Tenant config write-back failed: {e}");
        }
    }
}
