//! Tenant Resolution
//!
//! Three-tier lookup producing the tenant configuration the kiosk runs
//! under: local cache → remote store → bundled static defaults. Every
//! successful higher-tier resolution is written back to the local cache
//! so a previously-resolved tenant can always start offline.

mod defaults;
mod resolver;

pub use defaults::bundled_defaults;
pub use resolver::{TenantResolutionError, TenantResolver};
