use shared_types::Address;
use thiserror::Error;

/// Routing failures reported to unicast and forwarding callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("No route to {0}")]
    NoRoute(Address),

    #[error("No neighbor available")]
    NoNeighbor,
}
