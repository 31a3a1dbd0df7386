use pc_01_routing::RoutingError;
use shared_types::{Address, MessageKind, SerializationError};
use thiserror::Error;

/// Failures reported by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Transport timeout")]
    Timeout,

    #[error("Transport closed")]
    Closed,

    #[error("Unknown peer {0}")]
    UnknownPeer(Address),

    #[error("Packet too large: {size} bytes (max: {max})")]
    PacketTooLarge { size: usize, max: usize },

    #[error("Transport I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// A rumor whose sequence does not directly follow the stored log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Out-of-order rumor from {origin}: expected sequence {expected}, got {actual}")]
pub struct OutOfOrderRumor {
    pub origin: Address,
    pub expected: u64,
    pub actual: u64,
}

/// Gossip engine errors.
#[derive(Debug, Error)]
pub enum GossipError {
    #[error("No route to {0}")]
    NoRoute(Address),

    #[error("No neighbor available")]
    NoNeighbor,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    OutOfOrder(#[from] OutOfOrderRumor),

    #[error("No handler registered for message type {0}")]
    NoHandler(MessageKind),

    #[error("Handler failed: {0}")]
    Handler(String),
}

impl From<RoutingError> for GossipError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::NoRoute(dest) => GossipError::NoRoute(dest),
            RoutingError::NoNeighbor => GossipError::NoNeighbor,
        }
    }
}
