//! Reqwest implementation of [`RemoteStore`]
//!
//! All requests share one client with a bounded timeout from config.
//! Responses are plain JSON bodies; 404 maps to `Ok(None)` for lookups,
//! 5xx maps to `Network` (transient), other 4xx map to `Rejected`.

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use super::{RemoteError, RemoteStore};
use async_trait::async_trait;
use shared::models::{LeadRecord, LicenseRecord, TenantConfig};

/// Header carrying the client-generated dedup key for lead submission.
const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

#[derive(Serialize)]
struct LeadSubmission<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    tenant_slug: &'a str,
    captured_at: i64,
}

#[derive(Serialize)]
struct DeviceBinding<'a> {
    device_id: &'a str,
}

/// HTTP client for the central store
#[derive(Clone, Debug)]
pub struct CloudClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CloudClient {
    /// Build a client with a hard per-request deadline. Construction only
    /// fails on a malformed timeout, so misconfiguration surfaces at
    /// startup rather than mid-sync.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout_ms: u64,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| RemoteError::Network(format!("Failed to build HTTP client: {e}")))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Map a non-success status to the error taxonomy.
    async fn classify_failure(resp: reqwest::Response, context: &str) -> RemoteError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };

        if status == StatusCode::NOT_FOUND {
            RemoteError::NotFound(format!("{context}: {detail}"))
        } else if status.is_server_error() {
            RemoteError::Network(format!("{context}: {detail}"))
        } else {
            RemoteError::Rejected(format!("{context}: {detail}"))
        }
    }
}

#[async_trait]
impl RemoteStore for CloudClient {
    async fn ping(&self) -> Result<(), RemoteError> {
        let resp = self
            .request(reqwest::Method::GET, "/api/health")
            .send()
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(RemoteError::Network(format!(
                "Health probe returned {}",
                resp.status()
            )))
        }
    }

    async fn create_lead(
        &self,
        lead: &LeadRecord,
        idempotency_key: &str,
    ) -> Result<(), RemoteError> {
        let body = LeadSubmission {
            name: &lead.name,
            email: &lead.email,
            phone: lead.phone.as_deref(),
            tenant_slug: &lead.tenant_slug,
            captured_at: lead.created_at,
        };

        let resp = self
            .request(reqwest::Method::POST, "/api/leads")
            .header(IDEMPOTENCY_HEADER, idempotency_key)
            .json(&body)
            .send()
            .await?;

        // 409 = the dedup key already landed in a previous attempt
        if resp.status().is_success() || resp.status() == StatusCode::CONFLICT {
            Ok(())
        } else {
            Err(Self::classify_failure(resp, "create_lead").await)
        }
    }

    async fn fetch_license(
        &self,
        license_key: &str,
    ) -> Result<Option<LicenseRecord>, RemoteError> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/api/licenses/{license_key}"))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let license: LicenseRecord = resp
                    .json()
                    .await
                    .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
                Ok(Some(license))
            }
            _ => Err(Self::classify_failure(resp, "fetch_license").await),
        }
    }

    async fn bind_device(&self, license_key: &str, device_id: &str) -> Result<(), RemoteError> {
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/api/licenses/{license_key}/devices"),
            )
            .json(&DeviceBinding { device_id })
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::classify_failure(resp, "bind_device").await)
        }
    }

    async fn fetch_tenant(&self, slug: &str) -> Result<Option<TenantConfig>, RemoteError> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/api/tenants/{slug}"))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let config: TenantConfig = resp
                    .json()
                    .await
                    .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
                Ok(Some(config))
            }
            _ => Err(Self::classify_failure(resp, "fetch_tenant").await),
        }
    }
}
