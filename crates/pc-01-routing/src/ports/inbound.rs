//! Inbound ports (API) for the Routing subsystem.

use std::collections::{HashMap, HashSet};

use shared_types::Address;

use crate::domain::RoutingError;

/// Internally synchronized routing table shared by the node's tasks.
pub trait RoutingTable: Send + Sync {
    /// Address of the local node.
    fn local_address(&self) -> Address;

    /// Insert or update `origin -> relay`. No-op for direct neighbors;
    /// returns whether the table changed.
    fn set_entry(&self, origin: Address, relay: Address) -> bool;

    fn get_entry(&self, origin: &str) -> Option<Address>;

    fn remove_entry(&self, origin: &str) -> Option<Address>;

    /// Uniformly random neighbor, never the local node nor any of `excluding`.
    fn random_neighbor(&self, excluding: &HashSet<Address>) -> Option<Address>;

    /// Copy of every entry, including the local self-route.
    fn snapshot(&self) -> HashMap<Address, Address>;

    /// Register `peer` as a direct neighbor (`peer -> peer`).
    fn add_neighbor(&self, peer: Address);

    /// Next hop towards `destination`.
    fn route(&self, destination: &str) -> Result<Address, RoutingError> {
        self.get_entry(destination)
            .ok_or_else(|| RoutingError::NoRoute(destination.to_string()))
    }
}
