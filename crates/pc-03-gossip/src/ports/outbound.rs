//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the gossip engine requires from its host.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{Address, Header, Message, Packet};

pub use crate::domain::TransportError;
use crate::domain::GossipError;

/// Packet transport.
///
/// Production: `UdpTransport`. Testing: `MemoryTransport`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `packet` to `dest`. A zero `timeout` waits indefinitely.
    async fn send(&self, dest: &str, packet: Packet, timeout: Duration)
        -> Result<(), TransportError>;

    /// Receive the next packet. A zero `timeout` waits indefinitely.
    async fn recv(&self, timeout: Duration) -> Result<Packet, TransportError>;

    fn local_address(&self) -> Address;
}

/// Handler for one [`MessageKind`](shared_types::MessageKind), registered on
/// the gossip service.
///
/// `header.source` is the node that created the message: the rumor origin
/// for gossiped messages.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, msg: Message, header: Header) -> Result<(), GossipError>;
}
