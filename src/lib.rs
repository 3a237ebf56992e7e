//! Shared-storage MJPEG frame relay
//!
//! Relays a rapidly-overwritten artifact (a camera's latest JPEG frame) from
//! one producer to many concurrent consumers. The hand-off point is durable
//! storage rather than memory, so multiple independent server processes can
//! serve pushes and streams for the same cameras with no coordination
//! protocol beyond an atomic file rename.
//!
//! # Architecture
//!
//! ```text
//!   POST /push/{id}                              GET /stream/{id}
//!        │                                             ▲
//!        ▼                                             │ multipart frames
//!   FrameStore::write ──atomic rename──► {id}.jpg      │
//!                                            │    FrameWatcher (per consumer)
//!                                            └──revision()/read()──┘
//!
//!   StatusTracker: process-local last-seen map, feeds GET /health
//! ```
//!
//! Exactly one "latest value" is kept per camera; there is no queue and no
//! history. A reader always observes a complete frame: writes stage the
//! payload in a temporary file and publish it with a single rename.
//!
//! # Example
//!
//! ```no_run
//! use camrelay::{RelayServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> camrelay::Result<()> {
//!     let config = ServerConfig::default().frame_dir("frames");
//!     let server = RelayServer::new(config).await?;
//!     server.run().await
//! }
//! ```

pub mod error;
pub mod server;
pub mod status;
pub mod store;
pub mod stream;

pub use error::{Error, Result};
pub use server::{RelayServer, ServerConfig};
pub use status::{SourceStatus, StatusTracker, STALE_AFTER};
pub use store::{FrameStore, Revision, SourceId, StoreError};
pub use stream::{FrameWatcher, DEFAULT_POLL_INTERVAL};
