//! Durable latest-frame storage
//!
//! The hand-off point between one producer and any number of consumers,
//! possibly spread across unrelated processes on the same host. Each camera
//! owns exactly one slot; a write replaces the slot wholesale via an atomic
//! rename, which is the sole synchronization primitive in the system.
//!
//! ```text
//!   producer ──write──► {key}.jpg.{pid}-{seq}.tmp ──rename──► {key}.jpg
//!                                                                 │
//!                                  consumers ◄──read/revision─────┘
//! ```

pub mod error;
pub mod key;
pub mod store;

pub use error::StoreError;
pub use key::SourceId;
pub use store::{FrameStore, Revision};
