//! Relay daemon
//!
//! Run with: relayd
//!
//! Environment:
//!   PORT       port to listen on (default 8000)
//!   FRAME_DIR  frames directory shared between processes (default "frames")
//!   RUST_LOG   tracing filter, e.g. camrelay=debug

use std::net::SocketAddr;

use camrelay::{RelayServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("camrelay=info".parse()?)
                .add_directive("relayd=info".parse()?),
        )
        .init();

    let mut config = ServerConfig::default();

    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port
            .parse()
            .map_err(|_| format!("invalid PORT value: {}", port))?;
        config = config.bind(SocketAddr::from(([0, 0, 0, 0], port)));
    }
    if let Ok(dir) = std::env::var("FRAME_DIR") {
        config = config.frame_dir(dir);
    }

    println!("Starting camrelay on {}", config.bind_addr);
    println!();
    println!("=== Push frames ===");
    println!("curl -X POST --data-binary @frame.jpg http://localhost:{}/push/cam1", config.bind_addr.port());
    println!();
    println!("=== Watch ===");
    println!("Viewer:  http://localhost:{}/", config.bind_addr.port());
    println!("Stream:  http://localhost:{}/stream/cam1", config.bind_addr.port());
    println!("Health:  http://localhost:{}/health", config.bind_addr.port());
    println!();

    let server = RelayServer::new(config).await?;

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;

    Ok(())
}
