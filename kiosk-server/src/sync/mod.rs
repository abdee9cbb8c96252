//! Lead Synchronization
//!
//! Drains the local durable lead queue into the central store. Split in
//! two: [`SyncService`] owns the single-flight drain pass and the
//! aggregate stats, [`SyncWorker`] owns the schedule (startup run + fixed
//! interval) and its lifecycle.

mod service;
mod worker;

pub use service::{SyncOutcome, SyncService, idempotency_key};
pub use worker::SyncWorker;
