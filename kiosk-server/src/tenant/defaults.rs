//! Bundled default tenant configurations
//!
//! Shipped with the binary as a last-resort resolution tier, so a fresh
//! installation can show a usable (unbranded) kiosk with no network and
//! no prior resolution.

use shared::models::TenantConfig;
use std::sync::OnceLock;

static DEFAULTS: OnceLock<Vec<TenantConfig>> = OnceLock::new();

/// The static defaults bundled into the binary.
pub fn bundled_defaults() -> &'static [TenantConfig] {
    DEFAULTS.get_or_init(|| {
        match serde_json::from_str(include_str!("../../assets/default_tenants.json")) {
            Ok(configs) => configs,
            Err(e) => {
                tracing::error!("Bundled default tenants are malformed: {e}");
                Vec::new()
            }
        }
    })
}
