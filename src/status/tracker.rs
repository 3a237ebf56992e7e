//! Last-seen tracking and staleness accounting
//!
//! Answers "when did we last hear from camera X, and is that recent enough
//! to trust". The map is process-local and best-effort: frames are shared
//! across processes through the frame store, but each process only records
//! the writes it served itself, so two processes behind one load balancer
//! may disagree here. Not a synchronization point.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::store::SourceId;

/// Age beyond which a camera is reported stale
pub const STALE_AFTER: Duration = Duration::from_secs(10);

/// Point-in-time status for one camera
///
/// Recomputed fresh on every query; never cached.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    /// Normalized camera identifier
    pub camera_id: String,
    /// Seconds since the UNIX epoch of the last recorded write, `0.0` if
    /// this process has never recorded one
    pub last_seen_ts: f64,
    /// Seconds since the last recorded write, `None` if never recorded
    pub last_seen_age_sec: Option<f64>,
    /// Whether the camera has gone quiet (age above threshold, or never seen)
    pub is_stale: bool,
}

/// Process-local last-write bookkeeping per camera
pub struct StatusTracker {
    last_seen: RwLock<HashMap<String, SystemTime>>,
}

impl StatusTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            last_seen: RwLock::new(HashMap::new()),
        }
    }

    /// Record a successful frame write for a camera at the current time
    pub async fn record_write(&self, id: &SourceId) {
        let mut map = self.last_seen.write().await;
        map.insert(id.storage_key(), SystemTime::now());
    }

    /// Current status for one camera, by storage key
    pub async fn status_of(&self, camera_id: &str) -> SourceStatus {
        let last_seen = {
            let map = self.last_seen.read().await;
            map.get(camera_id).copied()
        };

        compute_status(camera_id, last_seen, SystemTime::now())
    }

    /// Statuses for a set of cameras, in the given order
    ///
    /// Callers drive this with [`FrameStore::list_identifiers`] so the report
    /// covers every camera with an existing slot, including ones written by
    /// other processes (those show as never-seen here).
    ///
    /// [`FrameStore::list_identifiers`]: crate::store::FrameStore::list_identifiers
    pub async fn all_statuses(&self, camera_ids: &[String]) -> Vec<SourceStatus> {
        let map = self.last_seen.read().await;
        let now = SystemTime::now();

        camera_ids
            .iter()
            .map(|id| compute_status(id, map.get(id).copied(), now))
            .collect()
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a status from a last-seen time and a query-time clock
fn compute_status(camera_id: &str, last_seen: Option<SystemTime>, now: SystemTime) -> SourceStatus {
    let last_seen_ts = last_seen
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    let age = last_seen.map(|t| now.duration_since(t).unwrap_or_default().as_secs_f64());

    SourceStatus {
        camera_id: camera_id.to_string(),
        last_seen_ts,
        last_seen_age_sec: age,
        is_stale: age.map_or(true, |a| a > STALE_AFTER.as_secs_f64()),
    }
}
