//! Relay server
//!
//! Binds the listener and serves the HTTP surface. Each inbound connection
//! is handled on its own task by the runtime; producers and consumers for
//! the same camera coordinate only through the frame store, so any number
//! of server processes can share one frames directory.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::Result;
use crate::server::config::ServerConfig;
use crate::server::http::{router, AppState};
use crate::status::StatusTracker;
use crate::store::FrameStore;

/// MJPEG relay server
pub struct RelayServer {
    config: ServerConfig,
    store: Arc<FrameStore>,
    tracker: Arc<StatusTracker>,
}

impl RelayServer {
    /// Create a new server, opening (and creating if needed) the frames
    /// directory
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let store = Arc::new(FrameStore::open(&config.frame_dir).await?);

        Ok(Self {
            config,
            store,
            tracker: Arc::new(StatusTracker::new()),
        })
    }

    /// Get a reference to the frame store
    pub fn store(&self) -> &Arc<FrameStore> {
        &self.store
    }

    /// Get a reference to the status tracker
    pub fn tracker(&self) -> &Arc<StatusTracker> {
        &self.tracker
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> std::net::SocketAddr {
        self.config.bind_addr
    }

    fn app_state(&self) -> AppState {
        AppState {
            store: Arc::clone(&self.store),
            tracker: Arc::clone(&self.tracker),
            poll_interval: self.config.poll_interval,
        }
    }

    /// Run the server
    ///
    /// This method blocks until the serve loop fails.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            frames = %self.config.frame_dir.display(),
            "Relay server listening"
        );

        axum::serve(listener, router(self.app_state())).await?;
        Ok(())
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            frames = %self.config.frame_dir.display(),
            "Relay server listening"
        );

        axum::serve(listener, router(self.app_state()))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Relay server stopped");
        Ok(())
    }
}
