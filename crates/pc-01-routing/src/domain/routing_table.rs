//! Routing state: `origin -> relay` entries.

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::seq::IteratorRandom;
use rand::Rng;
use shared_types::Address;

/// The unsynchronized routing map.
#[derive(Debug, Clone)]
pub struct RoutingState {
    local: Address,
    entries: HashMap<Address, Address>,
}

impl RoutingState {
    /// Create a table that already routes `local` to itself.
    pub fn new(local: Address) -> Self {
        let mut entries = HashMap::new();
        entries.insert(local.clone(), local.clone());
        Self { local, entries }
    }

    pub fn local(&self) -> &Address {
        &self.local
    }

    /// Insert or update a route.
    ///
    /// Returns `false` without touching the table when `origin` is already a
    /// direct neighbor (mapped to itself).
    pub fn set_entry(&mut self, origin: Address, relay: Address) -> bool {
        if self.is_neighbor(&origin) {
            return false;
        }
        self.entries.insert(origin, relay);
        true
    }

    pub fn get_entry(&self, origin: &str) -> Option<&Address> {
        self.entries.get(origin)
    }

    /// Remove a route. The local entry is never removed.
    pub fn remove_entry(&mut self, origin: &str) -> Option<Address> {
        if origin == self.local {
            return None;
        }
        self.entries.remove(origin)
    }

    /// Whether `origin` is mapped to itself.
    pub fn is_neighbor(&self, origin: &str) -> bool {
        self.entries.get(origin).is_some_and(|relay| relay == origin)
    }

    /// Distinct relay addresses, minus `excluding`.
    pub fn neighbors(&self, excluding: &HashSet<Address>) -> BTreeSet<Address> {
        self.entries
            .values()
            .filter(|relay| !excluding.contains(*relay))
            .cloned()
            .collect()
    }

    /// Uniformly random relay not in `excluding`.
    pub fn random_neighbor<R: Rng + ?Sized>(
        &self,
        excluding: &HashSet<Address>,
        rng: &mut R,
    ) -> Option<Address> {
        self.neighbors(excluding).into_iter().choose(rng)
    }

    pub fn entries(&self) -> &HashMap<Address, Address> {
        &self.entries
    }
}
