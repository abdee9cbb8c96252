//! Shared types for the kiosk lead-capture platform
//!
//! Common data models used across the kiosk server and admin/desktop
//! clients: lead records, license records, tenant configuration and
//! sync statistics, plus small time utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    CachedLicense, LeadCreate, LeadRecord, LeadStats, LicenseRecord, LicenseStatus, SyncStats,
    SyncStatus, TenantConfig,
};
