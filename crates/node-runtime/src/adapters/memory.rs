//! # In-Memory Network
//!
//! A hub of unbounded tokio channels keyed by address. Every
//! [`MemoryTransport`] created from the same [`MemoryNetwork`] can reach the
//! others; links can be cut to simulate loss and partitions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use pc_03_gossip::{Transport, TransportError};
use shared_types::{Address, Packet};
use tokio::sync::{mpsc, Mutex};
use tracing::trace;

use super::with_timeout;

#[derive(Default)]
pub struct MemoryNetwork {
    inboxes: RwLock<HashMap<Address, mpsc::UnboundedSender<Packet>>>,
    /// Directed links whose packets are silently dropped.
    cut: RwLock<HashSet<(Address, Address)>>,
}

impl MemoryNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a new endpoint at `address`, replacing any previous one.
    pub fn transport(self: &Arc<Self>, address: impl Into<Address>) -> MemoryTransport {
        let local = address.into();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inboxes.write().insert(local.clone(), tx);
        MemoryTransport {
            local,
            network: Arc::clone(self),
            inbox: Mutex::new(rx),
        }
    }

    /// Detach `address`; later sends to it fail with `UnknownPeer`.
    pub fn disconnect(&self, address: &str) {
        self.inboxes.write().remove(address);
    }

    /// Drop every packet sent from `from` to `to`.
    pub fn cut_link(&self, from: &str, to: &str) {
        self.cut.write().insert((from.to_string(), to.to_string()));
    }

    pub fn restore_link(&self, from: &str, to: &str) {
        self.cut.write().remove(&(from.to_string(), to.to_string()));
    }

    fn deliver(&self, from: &str, to: &str, packet: Packet) -> Result<(), TransportError> {
        if self.cut.read().contains(&(from.to_string(), to.to_string())) {
            trace!(%from, %to, "packet dropped on cut link");
            return Ok(());
        }
        let inboxes = self.inboxes.read();
        let inbox = inboxes
            .get(to)
            .ok_or_else(|| TransportError::UnknownPeer(to.to_string()))?;
        inbox.send(packet).map_err(|_| TransportError::Closed)
    }
}

pub struct MemoryTransport {
    local: Address,
    network: Arc<MemoryNetwork>,
    inbox: Mutex<mpsc::UnboundedReceiver<Packet>>,
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(
        &self,
        dest: &str,
        packet: Packet,
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        self.network.deliver(&self.local, dest, packet)
    }

    async fn recv(&self, timeout: Duration) -> Result<Packet, TransportError> {
        let mut inbox = self.inbox.lock().await;
        with_timeout(timeout, async {
            inbox.recv().await.ok_or(TransportError::Closed)
        })
        .await
    }

    fn local_address(&self) -> Address {
        self.local.clone()
    }
}
