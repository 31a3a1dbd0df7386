//! # Adapter Implementations
//!
//! Concrete implementations of the gossip [`Transport`](pc_03_gossip::Transport)
//! port.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  OUTER LAYER (Adapters)                      │
//! │      MemoryTransport (tests, demos)   UdpTransport (binary)  │
//! │                        ↑ implements ↑                        │
//! │                 trait Transport (pc-03 ports)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
pub mod udp;

use std::future::Future;
use std::time::Duration;

use pc_03_gossip::TransportError;

pub use memory::{MemoryNetwork, MemoryTransport};
pub use udp::UdpTransport;

/// Run `fut`, bounded by `timeout` unless it is zero.
pub(crate) async fn with_timeout<F, T>(timeout: Duration, fut: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    if timeout.is_zero() {
        return fut.await;
    }
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| TransportError::Timeout)?
}
