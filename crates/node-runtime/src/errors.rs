use pc_01_routing::RoutingError;
use pc_02_chain_storage::ChainError;
use pc_03_gossip::GossipError;
use pc_04_consensus::ConsensusError;
use thiserror::Error;

use crate::container::ConfigError;

/// Errors returned by [`Node`](crate::Node) operations.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Node is already started")]
    AlreadyStarted,

    #[error("Node is not started")]
    NotStarted,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Gossip(#[from] GossipError),

    #[error(transparent)]
    Consensus(#[from] ConsensusError),
}
