//! # Cluster Harness
//!
//! Builds several nodes over one [`MemoryNetwork`] with short timings.

use std::sync::Arc;
use std::time::Duration;

use node_runtime::adapters::MemoryNetwork;
use node_runtime::{Node, NodeConfig};
use shared_types::Address;
use tokio::time::Instant;

/// How neighbors are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every node is a neighbor of every other.
    Mesh,
    /// `n0 - n1 - ... - nk`.
    Line,
}

pub struct Cluster {
    pub network: Arc<MemoryNetwork>,
    pub nodes: Vec<Node>,
}

pub fn address(i: usize) -> Address {
    format!("n{}", i)
}

/// Timings short enough for tests; periodic tasks off.
pub fn fast_config(total_peers: u64, paxos_id: u64) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.gossip.ack_timeout = Duration::from_millis(300);
    config.gossip.recv_timeout = Duration::from_millis(50);
    config.gossip.continue_mongering = 0.0;
    config.paxos.total_peers = total_peers;
    config.paxos.paxos_id = paxos_id;
    config.paxos.proposer_retry = Duration::from_millis(400);
    config
}

impl Cluster {
    /// `size` stopped nodes, with `tweak` applied to each config.
    pub fn build<F>(size: usize, topology: Topology, tweak: F) -> Self
    where
        F: Fn(&mut NodeConfig),
    {
        let network = MemoryNetwork::new();
        let nodes = (0..size)
            .map(|i| {
                let mut config = fast_config(size as u64, i as u64 + 1);
                config.peers = match topology {
                    Topology::Mesh => (0..size).filter(|&j| j != i).map(address).collect(),
                    Topology::Line => [i.checked_sub(1), Some(i + 1).filter(|&j| j < size)]
                        .into_iter()
                        .flatten()
                        .map(address)
                        .collect(),
                };
                tweak(&mut config);
                Node::new(config, Arc::new(network.transport(address(i))))
                    .expect("valid test config")
            })
            .collect();
        Self { network, nodes }
    }

    /// `size` started nodes.
    pub async fn start(size: usize, topology: Topology) -> Self {
        Self::start_with(size, topology, |_| {}).await
    }

    pub async fn start_with<F>(size: usize, topology: Topology, tweak: F) -> Self
    where
        F: Fn(&mut NodeConfig),
    {
        let cluster = Self::build(size, topology, tweak);
        for node in &cluster.nodes {
            node.start().await.expect("node starts");
        }
        cluster
    }

    pub async fn stop(&self) {
        for node in &self.nodes {
            if node.is_running() {
                node.stop().await.expect("node stops");
            }
        }
    }
}

/// Poll `cond` until it holds or `timeout` passes.
pub async fn wait_until<F>(timeout: Duration, cond: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
