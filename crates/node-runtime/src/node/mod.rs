//! # Node
//!
//! A running peer: the subsystem container plus its background tasks.
//!
//! ## Tasks
//!
//! ```text
//! start() ─┬─→ receive loop ──→ spawn handle_packet per packet
//!          ├─→ anti-entropy ticker (if interval > 0)
//!          └─→ heartbeat ticker    (if interval > 0)
//!
//! stop()  ──→ shutdown signal ──→ every task exits ──→ joined
//! ```
//!
//! Outstanding ack waits are not cancelled by `stop()`; they expire or are
//! acked on their own.

mod proposer;
mod tasks;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pc_01_routing::RoutingTable;
use pc_02_chain_storage::ChainStore;
use pc_03_gossip::{GossipApi, RumorStore, Transport};
use shared_types::{Address, Message, Rumor, StatusVector};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::container::{NodeConfig, SubsystemContainer};
use crate::errors::NodeError;

struct Running {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

pub struct Node {
    container: Arc<SubsystemContainer>,
    running: Mutex<Option<Running>>,
}

impl Node {
    /// Create a stopped node with an in-memory chain.
    pub fn new(config: NodeConfig, transport: Arc<dyn Transport>) -> Result<Self, NodeError> {
        Ok(Self::from_container(SubsystemContainer::new(
            config, transport,
        )?))
    }

    /// Create a stopped node on top of an existing chain.
    pub fn with_chain(
        config: NodeConfig,
        transport: Arc<dyn Transport>,
        chain: Arc<dyn ChainStore>,
    ) -> Result<Self, NodeError> {
        Ok(Self::from_container(SubsystemContainer::with_chain(
            config, transport, chain,
        )?))
    }

    pub fn from_container(container: SubsystemContainer) -> Self {
        Self {
            container: Arc::new(container),
            running: Mutex::new(None),
        }
    }

    /// Get a reference to the subsystem container.
    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }

    pub fn local_address(&self) -> Address {
        self.container.local_address().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    pub(crate) fn ensure_running(&self) -> Result<(), NodeError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(NodeError::NotStarted)
        }
    }

    /// Start the receive loop and the periodic tasks.
    pub async fn start(&self) -> Result<(), NodeError> {
        let mut running = self.running.lock();
        if running.is_some() {
            return Err(NodeError::AlreadyStarted);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let gossip = &self.container.gossip;
        let config = &self.container.config.gossip;

        let mut tasks = vec![tokio::spawn(tasks::receive_loop(
            Arc::clone(gossip),
            Arc::clone(&self.container.transport),
            config.recv_timeout,
            shutdown_rx.clone(),
        ))];

        if !config.anti_entropy_interval.is_zero() {
            let gossip = Arc::clone(gossip);
            tasks.push(tasks::spawn_ticker(
                config.anti_entropy_interval,
                shutdown_rx.clone(),
                move || {
                    let gossip = Arc::clone(&gossip);
                    async move {
                        if let Err(err) = gossip.anti_entropy().await {
                            warn!(peer = %gossip.local_address(), error = %err, "anti-entropy round failed");
                        }
                    }
                },
            ));
        }

        if !config.heartbeat_interval.is_zero() {
            let gossip = Arc::clone(gossip);
            tasks.push(tasks::spawn_ticker(
                config.heartbeat_interval,
                shutdown_rx,
                move || {
                    let gossip = Arc::clone(&gossip);
                    async move {
                        if let Err(err) = gossip.heartbeat().await {
                            warn!(peer = %gossip.local_address(), error = %err, "heartbeat failed");
                        }
                    }
                },
            ));
        }

        info!(peer = %self.local_address(), tasks = tasks.len(), "node started");
        *running = Some(Running { shutdown_tx, tasks });
        Ok(())
    }

    /// Signal every task to stop and wait for them to exit.
    pub async fn stop(&self) -> Result<(), NodeError> {
        let running = self.running.lock().take().ok_or(NodeError::NotStarted)?;

        if running.shutdown_tx.send(true).is_err() {
            debug!(peer = %self.local_address(), "tasks already exited");
        }
        for task in running.tasks {
            if let Err(err) = task.await {
                warn!(peer = %self.local_address(), error = %err, "task ended abnormally");
            }
        }

        info!(peer = %self.local_address(), "node stopped");
        Ok(())
    }

    /// Gossip `msg` to every peer.
    pub async fn broadcast(&self, msg: Message) -> Result<Rumor, NodeError> {
        Ok(self.container.gossip.broadcast(msg).await?)
    }

    /// Send `msg` to `dest` along the routing table.
    pub async fn unicast(&self, dest: &str, msg: Message) -> Result<(), NodeError> {
        Ok(self.container.gossip.unicast(dest, msg).await?)
    }

    /// Add direct neighbors.
    pub fn add_peer<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Address>,
    {
        for peer in peers {
            let peer = peer.into();
            if peer == *self.container.local_address() {
                continue;
            }
            self.container.routing.add_neighbor(peer);
        }
    }

    /// Copy of the routing table, including the self-route.
    pub fn routing_table(&self) -> HashMap<Address, Address> {
        self.container.routing.snapshot()
    }

    /// Route `origin` through `relay`; an empty relay removes the entry. The
    /// node's own entry is never changed.
    pub fn set_routing_entry(&self, origin: &str, relay: &str) {
        if origin == self.container.local_address() {
            return;
        }
        let routing = &self.container.routing;
        routing.remove_entry(origin);
        if !relay.is_empty() {
            routing.set_entry(origin.to_string(), relay.to_string());
        }
    }

    pub fn status_vector(&self) -> StatusVector {
        self.container.rumors.status_vector()
    }

    pub fn chain(&self) -> Arc<dyn ChainStore> {
        Arc::clone(&self.container.chain)
    }
}
