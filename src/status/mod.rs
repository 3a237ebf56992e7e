//! Per-camera liveness reporting
//!
//! Cheap, approximate last-seen tracking scoped to one process. Authoritative
//! frame data lives in [`crate::store`]; this module only feeds the health
//! report.

pub mod tracker;

pub use tracker::{SourceStatus, StatusTracker, STALE_AFTER};
