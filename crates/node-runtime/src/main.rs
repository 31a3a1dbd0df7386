//! # Peerchain Node
//!
//! Runs one peer over UDP.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `PC_*` environment)
//! 2. Bind the UDP transport on `listen_address`
//! 3. Initialize subsystems and add the configured peers
//! 4. Start the receive loop and periodic tasks
//! 5. Run until Ctrl+C, then stop

use std::sync::Arc;

use anyhow::{Context, Result};
use node_runtime::adapters::UdpTransport;
use node_runtime::{Node, NodeConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env();
    config.validate().context("Invalid node configuration")?;

    let transport = UdpTransport::bind(&config.listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_address))?;

    info!("===========================================");
    info!("  Peerchain Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let node = Node::new(config, Arc::new(transport)).context("Failed to initialize node")?;
    node.start().await.context("Failed to start node")?;

    info!(peer = %node.local_address(), "Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    node.stop().await.context("Failed to stop node")?;
    let length = node.chain().length().context("Failed to read chain")?;
    info!(peer = %node.local_address(), blocks = length, "Shutdown complete");

    Ok(())
}
