//! Change-driven streaming to consumers
//!
//! One [`FrameWatcher`] per consumer connection polls the frame store and
//! pushes each newly published frame, wrapped in multipart framing, into the
//! connection's response channel. Watchers coordinate with producers only
//! through the store; they hold no shared in-memory state.

pub mod multipart;
pub mod watcher;

pub use watcher::{FrameWatcher, DEFAULT_POLL_INTERVAL};
