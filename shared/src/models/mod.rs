//! Data Models
//!
//! Serializable models shared between the kiosk server and its clients.

pub mod lead;
pub mod license;
pub mod sync;
pub mod tenant;

pub use lead::{LeadCreate, LeadRecord, LeadStats, SyncStatus};
pub use license::{CachedLicense, LicenseRecord, LicenseStatus};
pub use sync::SyncStats;
pub use tenant::{TenantConfig, TenantTheme};
