//! # Subsystem Container
//!
//! Holds every subsystem instance of one node and wires them together.
//!
//! ## Initialization Order
//!
//! ```text
//! Level 0: Routing (1), Chain Storage (2)   (no dependencies)
//! Level 1: Gossip (3)                       (routing, transport)
//! Level 2: Consensus (4)                    (chain storage)
//! Level 3: ConsensusHandler                 (gossip ←→ consensus)
//! ```
//!
//! ## Ownership
//!
//! - Each subsystem is internally synchronized and held behind an `Arc`.
//! - Gossip owns the consensus handler through its registry; the handler
//!   holds gossip weakly.

use std::sync::Arc;

use pc_01_routing::{RoutingService, RoutingTable};
use pc_02_chain_storage::{ChainStorageService, ChainStore, InMemoryKVStore};
use pc_03_gossip::{
    AckTimerRegistry, GossipApi, GossipService, SharedRumorStore, Transport,
};
use pc_04_consensus::{ConsensusEngine, MultiPaxos};
use shared_types::{Address, MessageKind};
use tracing::info;

use crate::container::config::NodeConfig;
use crate::errors::NodeError;
use crate::handlers::ConsensusHandler;

/// Central container holding all subsystem instances of one node.
pub struct SubsystemContainer {
    pub config: NodeConfig,
    pub transport: Arc<dyn Transport>,

    /// Routing (Subsystem 1)
    pub routing: Arc<RoutingService>,
    /// Chain Storage (Subsystem 2)
    pub chain: Arc<dyn ChainStore>,
    /// Gossip (Subsystem 3)
    pub gossip: Arc<GossipService>,
    pub rumors: Arc<SharedRumorStore>,
    pub acks: Arc<AckTimerRegistry>,
    /// Consensus (Subsystem 4)
    pub consensus: Arc<MultiPaxos>,
}

impl SubsystemContainer {
    /// Wire a node around `transport` with an in-memory chain.
    pub fn new(config: NodeConfig, transport: Arc<dyn Transport>) -> Result<Self, NodeError> {
        let chain: Arc<dyn ChainStore> =
            Arc::new(ChainStorageService::new(InMemoryKVStore::new()));
        Self::with_chain(config, transport, chain)
    }

    /// Wire a node around `transport` and an existing chain; consensus
    /// resumes at the chain's length.
    pub fn with_chain(
        config: NodeConfig,
        transport: Arc<dyn Transport>,
        chain: Arc<dyn ChainStore>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let local: Address = transport.local_address();

        let routing = Arc::new(RoutingService::new(local.clone()));
        for peer in &config.peers {
            routing.add_neighbor(peer.clone());
        }

        let rumors = Arc::new(SharedRumorStore::new());
        let acks = Arc::new(AckTimerRegistry::new());
        let gossip = Arc::new(GossipService::new(
            config.gossip.clone(),
            Arc::clone(&routing) as Arc<dyn RoutingTable>,
            Arc::clone(&rumors) as _,
            Arc::clone(&acks) as _,
            Arc::clone(&transport),
        ));

        let consensus = Arc::new(MultiPaxos::new(
            local.clone(),
            config.paxos.clone(),
            Arc::clone(&chain),
        )?);

        let gossip_api: Arc<dyn GossipApi> = Arc::clone(&gossip) as _;
        let handler = Arc::new(ConsensusHandler::new(
            local.clone(),
            Arc::clone(&consensus) as Arc<dyn ConsensusEngine>,
            Arc::downgrade(&gossip_api),
        ));
        gossip.register_handlers(&MessageKind::CONSENSUS, handler);

        info!(
            peer = %local,
            neighbors = config.peers.len(),
            total_peers = config.paxos.total_peers,
            paxos_id = config.paxos.paxos_id,
            step = consensus.current_step(),
            "subsystems initialized"
        );

        Ok(Self {
            config,
            transport,
            routing,
            chain,
            gossip,
            rumors,
            acks,
            consensus,
        })
    }

    pub fn local_address(&self) -> &Address {
        self.gossip.local_address()
    }
}
