//! Change-driven frame delivery for one consumer connection
//!
//! Each consumer gets its own watcher task polling the frame store for its
//! camera. A cheap revision check runs every cycle; the payload is only read
//! and delivered when the revision moved since the last delivery. There is
//! no history and no catch-up: a consumer sees the newest frame at the time
//! it looks, then every change after that.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::store::{FrameStore, Revision, SourceId};

use super::multipart;

/// Pause between revision checks
///
/// Bounds both idle CPU and the worst-case latency between a frame landing
/// in the store and a consumer receiving it.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Watches one camera's slot and pumps framed payloads to one consumer
pub struct FrameWatcher {
    store: Arc<FrameStore>,
    id: SourceId,
    poll_interval: Duration,
    last_delivered: Option<Revision>,
}

impl FrameWatcher {
    /// Create a watcher for one camera
    pub fn new(store: Arc<FrameStore>, id: SourceId) -> Self {
        Self {
            store,
            id,
            poll_interval: DEFAULT_POLL_INTERVAL,
            last_delivered: None,
        }
    }

    /// Override the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run the watch loop, sending each newly observed frame into `tx`
    /// wrapped in multipart framing
    ///
    /// Loops until the consumer disconnects: either the channel reports
    /// closed at the top of a cycle, or a delivery fails. A missing slot is
    /// not an error (the producer may not have started yet); a failed read
    /// is logged and retried on the next cycle, never fatal to the stream.
    pub async fn run(mut self, tx: mpsc::Sender<Bytes>) {
        tracing::debug!(camera = %self.id, "Frame watcher started");

        loop {
            if tx.is_closed() {
                break;
            }

            match self.store.revision(&self.id).await {
                Ok(revision) if self.last_delivered != Some(revision) => {
                    match self.store.read(&self.id).await {
                        Ok(payload) => {
                            if tx.send(multipart::encode_frame(&payload)).await.is_err() {
                                break;
                            }
                            self.last_delivered = Some(revision);
                        }
                        Err(e) if e.is_not_found() => {
                            // Slot vanished mid-replace; the next cycle sees
                            // the freshly renamed file.
                        }
                        Err(e) => {
                            tracing::warn!(camera = %self.id, error = %e, "Frame read failed, retrying");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    // Producer hasn't pushed anything yet; keep waiting.
                }
                Err(e) => {
                    tracing::warn!(camera = %self.id, error = %e, "Revision check failed, retrying");
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        tracing::debug!(camera = %self.id, "Consumer disconnected, frame watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use tempfile::tempdir;
    use tokio::time::{timeout, Duration};

    use super::*;

    const TEST_POLL: Duration = Duration::from_millis(5);
    const RECV_TIMEOUT: Duration = Duration::from_secs(2);

    async fn spawn_watcher(
        store: &Arc<FrameStore>,
        id: &str,
    ) -> (mpsc::Receiver<Bytes>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(8);
        let watcher = FrameWatcher::new(Arc::clone(store), SourceId::new(id))
            .with_poll_interval(TEST_POLL);
        let handle = tokio::spawn(watcher.run(tx));
        (rx, handle)
    }

    #[tokio::test]
    async fn test_frames_delivered_in_publish_order() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FrameStore::open(dir.path()).await.unwrap());
        let id = SourceId::new("cam1");

        let (mut rx, _handle) = spawn_watcher(&store, "cam1").await;

        store.write(&id, Bytes::from_static(b"frame-one")).await.unwrap();
        let first = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(first, multipart::encode_frame(b"frame-one"));

        // Leave room so the second write lands on a later revision.
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.write(&id, Bytes::from_static(b"frame-two")).await.unwrap();
        let second = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(second, multipart::encode_frame(b"frame-two"));
    }

    #[tokio::test]
    async fn test_unchanged_revision_emits_nothing() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FrameStore::open(dir.path()).await.unwrap());
        let id = SourceId::new("cam1");

        store.write(&id, Bytes::from_static(b"only")).await.unwrap();

        let (mut rx, _handle) = spawn_watcher(&store, "cam1").await;
        timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();

        // No further writes, so many poll cycles pass with no emission.
        let silence = timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(silence.is_err());
    }

    #[tokio::test]
    async fn test_waits_for_first_frame() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FrameStore::open(dir.path()).await.unwrap());
        let id = SourceId::new("late");

        let (mut rx, _handle) = spawn_watcher(&store, "late").await;

        // Producer not started: nothing arrives, stream stays up.
        let silence = timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(silence.is_err());

        store.write(&id, Bytes::from_static(b"finally")).await.unwrap();
        let frame = timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(frame, multipart::encode_frame(b"finally"));
    }

    #[tokio::test]
    async fn test_stops_when_consumer_disconnects() {
        let dir = tempdir().unwrap();
        let store = Arc::new(FrameStore::open(dir.path()).await.unwrap());
        let id = SourceId::new("cam1");

        store.write(&id, Bytes::from_static(b"frame")).await.unwrap();

        let (mut rx, handle) = spawn_watcher(&store, "cam1").await;
        timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();

        drop(rx);
        timeout(RECV_TIMEOUT, handle).await.unwrap().unwrap();
    }
}
