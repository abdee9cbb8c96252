//! Remote Store Client
//!
//! Thin client to the central multi-tenant store. Every call is fallible
//! and carries a bounded timeout; a timeout classifies as a network
//! failure, never as corrupt data. The [`RemoteStore`] trait is the seam
//! the sync worker, license validator and tenant resolver are written
//! against, so tests can script connectivity.

mod client;

pub use client::CloudClient;

use async_trait::async_trait;
use shared::models::{LeadRecord, LicenseRecord, TenantConfig};
use thiserror::Error;

/// Remote store error taxonomy
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure, timeout or 5xx — transient, retried on the next
    /// scheduled attempt, never fatal.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote explicitly has no such resource (clean 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote understood the request and said no (4xx).
    #[error("Rejected by remote store: {0}")]
    Rejected(String),

    /// The remote answered with something we cannot parse. This is a
    /// failure, not a "not found" — callers must not silently fall through.
    #[error("Invalid remote response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Errors the system degrades to offline/cached behavior on.
    pub fn is_network(&self) -> bool {
        matches!(self, RemoteError::Network(_))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::InvalidResponse(err.to_string())
        } else {
            // Timeouts, connect failures, dropped connections
            RemoteError::Network(err.to_string())
        }
    }
}

/// Client interface to the central store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Cheap reachability probe, used before draining the lead queue.
    async fn ping(&self) -> Result<(), RemoteError>;

    /// Submit one captured lead. `idempotency_key` is deterministic per
    /// local record so a crash-induced resubmission deduplicates
    /// server-side instead of creating a duplicate.
    async fn create_lead(&self, lead: &LeadRecord, idempotency_key: &str)
    -> Result<(), RemoteError>;

    /// Fetch the authoritative license record. `Ok(None)` means the key
    /// does not exist.
    async fn fetch_license(&self, license_key: &str)
    -> Result<Option<LicenseRecord>, RemoteError>;

    /// Append a device to the license's bound set and refresh its
    /// `last_validated_at`.
    async fn bind_device(&self, license_key: &str, device_id: &str) -> Result<(), RemoteError>;

    /// Fetch a tenant configuration by slug. `Ok(None)` means unknown slug.
    async fn fetch_tenant(&self, slug: &str) -> Result<Option<TenantConfig>, RemoteError>;
}
