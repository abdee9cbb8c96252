//! Shared test fixtures: an in-memory database pool and a scriptable
//! remote store standing in for the central API.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use kiosk_server::cloud::{RemoteError, RemoteStore};
use shared::models::{LeadCreate, LeadRecord, LicenseRecord, LicenseStatus, TenantConfig};

/// In-memory database with migrations applied. One connection only: each
/// in-memory SQLite connection is a separate database.
pub async fn test_pool() -> sqlx::SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    pool
}

pub fn lead_create(name: &str, email: &str) -> LeadCreate {
    LeadCreate {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

pub fn tenant_config(slug: &str, name: &str) -> TenantConfig {
    TenantConfig {
        slug: slug.to_string(),
        name: name.to_string(),
        theme: Default::default(),
        welcome_message: None,
    }
}

pub fn license_record(key: &str, tenant_id: &str, max_devices: u32) -> LicenseRecord {
    LicenseRecord {
        id: format!("lic-{key}"),
        license_key: key.to_string(),
        tenant_id: tenant_id.to_string(),
        status: LicenseStatus::Active,
        license_type: "STANDARD".to_string(),
        expires_at: None,
        max_devices,
        device_ids: Vec::new(),
        last_validated_at: None,
    }
}

/// Scriptable remote store.
///
/// Leads are stored keyed by idempotency key, so a resubmission under the
/// same key overwrites instead of duplicating, exactly like the real
/// server-side dedup.
pub struct MockRemote {
    reachable: AtomicBool,
    /// Extra delay inside `ping`, to hold a sync pass in flight.
    ping_delay_ms: AtomicU64,
    /// Lead ids whose upload fails with a network error.
    failing_leads: Mutex<Vec<i64>>,
    /// Received leads, keyed by idempotency key.
    leads: Mutex<HashMap<String, LeadRecord>>,
    licenses: Mutex<HashMap<String, LicenseRecord>>,
    tenants: Mutex<HashMap<String, TenantConfig>>,
    /// When set, `fetch_tenant` answers with garbage instead of a miss.
    tenant_invalid_response: AtomicBool,

    pub ping_calls: AtomicUsize,
    pub create_lead_calls: AtomicUsize,
    pub fetch_license_calls: AtomicUsize,
    pub bind_device_calls: AtomicUsize,
    pub fetch_tenant_calls: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
            ping_delay_ms: AtomicU64::new(0),
            failing_leads: Mutex::new(Vec::new()),
            leads: Mutex::new(HashMap::new()),
            licenses: Mutex::new(HashMap::new()),
            tenants: Mutex::new(HashMap::new()),
            tenant_invalid_response: AtomicBool::new(false),
            ping_calls: AtomicUsize::new(0),
            create_lead_calls: AtomicUsize::new(0),
            fetch_license_calls: AtomicUsize::new(0),
            bind_device_calls: AtomicUsize::new(0),
            fetch_tenant_calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        let mock = Self::new();
        mock.set_reachable(false);
        mock
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn set_ping_delay(&self, delay: Duration) {
        self.ping_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn fail_lead(&self, id: i64) {
        self.failing_leads.lock().unwrap().push(id);
    }

    pub fn clear_lead_failures(&self) {
        self.failing_leads.lock().unwrap().clear();
    }

    /// Distinct leads the remote ended up with.
    pub fn lead_count(&self) -> usize {
        self.leads.lock().unwrap().len()
    }

    pub fn put_license(&self, license: LicenseRecord) {
        self.licenses
            .lock()
            .unwrap()
            .insert(license.license_key.clone(), license);
    }

    pub fn get_license(&self, key: &str) -> Option<LicenseRecord> {
        self.licenses.lock().unwrap().get(key).cloned()
    }

    pub fn put_tenant(&self, config: TenantConfig) {
        self.tenants
            .lock()
            .unwrap()
            .insert(config.slug.clone(), config);
    }

    pub fn set_tenant_invalid_response(&self, invalid: bool) {
        self.tenant_invalid_response
            .store(invalid, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), RemoteError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteError::Network("connection refused".to_string()))
        }
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn ping(&self) -> Result<(), RemoteError> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.ping_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check_reachable()
    }

    async fn create_lead(
        &self,
        lead: &LeadRecord,
        idempotency_key: &str,
    ) -> Result<(), RemoteError> {
        self.create_lead_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if self.failing_leads.lock().unwrap().contains(&lead.id) {
            return Err(RemoteError::Network("injected upload failure".to_string()));
        }
        self.leads
            .lock()
            .unwrap()
            .insert(idempotency_key.to_string(), lead.clone());
        Ok(())
    }

    async fn fetch_license(
        &self,
        license_key: &str,
    ) -> Result<Option<LicenseRecord>, RemoteError> {
        self.fetch_license_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.licenses.lock().unwrap().get(license_key).cloned())
    }

    async fn bind_device(&self, license_key: &str, device_id: &str) -> Result<(), RemoteError> {
        self.bind_device_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let mut licenses = self.licenses.lock().unwrap();
        let license = licenses
            .get_mut(license_key)
            .ok_or_else(|| RemoteError::NotFound(format!("license {license_key}")))?;
        if license.has_device(device_id) {
            return Ok(());
        }
        if !license.has_device_capacity() {
            return Err(RemoteError::Rejected("device limit reached".to_string()));
        }
        license.device_ids.push(device_id.to_string());
        Ok(())
    }

    async fn fetch_tenant(&self, slug: &str) -> Result<Option<TenantConfig>, RemoteError> {
        self.fetch_tenant_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        if self.tenant_invalid_response.load(Ordering::SeqCst) {
            return Err(RemoteError::InvalidResponse(
                "unexpected payload shape".to_string(),
            ));
        }
        Ok(self.tenants.lock().unwrap().get(slug).cloned())
    }
}
