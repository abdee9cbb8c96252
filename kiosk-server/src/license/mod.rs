//! License Validation
//!
//! Determines, with bounded trust, whether this kiosk installation is
//! entitled to run. Online validation against the remote store with
//! device binding, falling back to a time-bounded local cache when the
//! network is down. After the cache window (default 7 days) expires the
//! kiosk must re-validate online.

mod cache;
mod device;
mod validator;

pub use cache::LicenseCache;
pub use device::DeviceIdentity;
pub use validator::{InvalidReason, LicenseState, LicenseValidator};
