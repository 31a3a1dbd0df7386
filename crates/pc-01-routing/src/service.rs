//! # Routing Service
//!
//! Wraps [`RoutingState`] behind a `parking_lot::RwLock`. The lock is scoped to
//! this component only; no other subsystem state is guarded by it.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use shared_types::Address;
use tracing::debug;

use crate::domain::RoutingState;
use crate::ports::inbound::RoutingTable;

#[derive(Debug)]
pub struct RoutingService {
    local: Address,
    state: RwLock<RoutingState>,
}

impl RoutingService {
    pub fn new(local: impl Into<Address>) -> Self {
        let local = local.into();
        Self {
            state: RwLock::new(RoutingState::new(local.clone())),
            local,
        }
    }
}

impl RoutingTable for RoutingService {
    fn local_address(&self) -> Address {
        self.local.clone()
    }

    fn set_entry(&self, origin: Address, relay: Address) -> bool {
        let changed = self.state.write().set_entry(origin.clone(), relay.clone());
        if changed {
            debug!(peer = %self.local, %origin, %relay, "routing entry updated");
        }
        changed
    }

    fn get_entry(&self, origin: &str) -> Option<Address> {
        self.state.read().get_entry(origin).cloned()
    }

    fn remove_entry(&self, origin: &str) -> Option<Address> {
        let removed = self.state.write().remove_entry(origin);
        if removed.is_some() {
            debug!(peer = %self.local, %origin, "routing entry removed");
        }
        removed
    }

    fn random_neighbor(&self, excluding: &HashSet<Address>) -> Option<Address> {
        let mut excluded = excluding.clone();
        excluded.insert(self.local.clone());
        self.state
            .read()
            .random_neighbor(&excluded, &mut rand::thread_rng())
    }

    fn snapshot(&self) -> HashMap<Address, Address> {
        self.state.read().entries().clone()
    }

    fn add_neighbor(&self, peer: Address) {
        if peer == self.local {
            return;
        }
        let mut state = self.state.write();
        state.remove_entry(&peer);
        state.set_entry(peer.clone(), peer);
    }
}
