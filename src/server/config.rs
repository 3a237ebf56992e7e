//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::stream::DEFAULT_POLL_INTERVAL;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Directory holding one latest-frame slot per camera
    ///
    /// Point every server process at the same directory to share cameras
    /// across processes.
    pub frame_dir: PathBuf,

    /// Pause between revision checks in each consumer's watch loop
    pub poll_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".parse().expect("valid default bind address"),
            frame_dir: PathBuf::from("frames"),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the frames directory
    pub fn frame_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frame_dir = dir.into();
        self
    }

    /// Set the consumer poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
