//! # Paxos Instance
//!
//! Acceptor and proposer state for one logical step.
//!
//! ## Acceptor Rules
//!
//! - Promise only to `id > max_id`.
//! - Accept only `id == max_id`.
//!
//! ## Proposer Rules
//!
//! - Adopt the value of the highest-numbered accepted proposal reported in
//!   the promises, if any.
//! - Proposal ids are `paxos_id + k * total_peers`, so two proposers never
//!   share an id.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shared_types::{Address, PaxosAcceptMessage, PaxosPromiseMessage, PaxosValue};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProposerPhase {
    #[default]
    Idle,
    PrepareSent,
    ProposeSent,
}

#[derive(Debug, Default)]
pub struct PaxosInstance {
    /// Highest prepare id promised.
    pub max_id: u64,
    /// Id of the last accepted proposal, 0 if none.
    pub accepted_id: u64,
    pub accepted_value: Option<PaxosValue>,

    pub phase: ProposerPhase,
    /// Id of this node's current prepare, 0 if it never prepared.
    pub proposed_id: u64,
    /// Promises for `proposed_id`, keyed by acceptor.
    pub promises: HashMap<Address, PaxosPromiseMessage>,

    /// Accepts per value unique id.
    pub accepts: HashMap<String, Vec<PaxosAcceptMessage>>,
    accept_sources: HashMap<String, HashSet<Address>>,

    pub finalized: Option<PaxosValue>,
    /// Signalled on promise quorum and on finalization.
    pub notify: Arc<Notify>,
}

impl PaxosInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acceptor side of phase 1. Returns the previously accepted proposal to
    /// report, or `None` if `id` is not above every promised id.
    pub fn promise(&mut self, id: u64) -> Option<(u64, Option<PaxosValue>)> {
        if id <= self.max_id {
            return None;
        }
        self.max_id = id;
        Some((self.accepted_id, self.accepted_value.clone()))
    }

    /// Acceptor side of phase 2.
    pub fn accept(&mut self, id: u64, value: &PaxosValue) -> bool {
        if id != self.max_id {
            return false;
        }
        self.accepted_id = id;
        self.accepted_value = Some(value.clone());
        true
    }

    /// Start (or restart) phase 1 with `id`.
    pub fn begin_prepare(&mut self, id: u64) {
        self.phase = ProposerPhase::PrepareSent;
        self.proposed_id = id;
        self.promises.clear();
    }

    /// Record a promise for our current prepare. Returns the number of
    /// distinct acceptors that promised, or `None` if the promise is not for
    /// the prepare we are waiting on.
    pub fn record_promise(&mut self, from: &str, promise: PaxosPromiseMessage) -> Option<usize> {
        if self.phase != ProposerPhase::PrepareSent || promise.id != self.proposed_id {
            return None;
        }
        self.promises.insert(from.to_string(), promise);
        Some(self.promises.len())
    }

    /// Value to propose: the highest-numbered accepted value among the
    /// promises, else `own`.
    pub fn choose_value(&self, own: PaxosValue) -> PaxosValue {
        self.promises
            .values()
            .filter(|p| p.accepted_id > 0)
            .max_by_key(|p| p.accepted_id)
            .and_then(|p| p.accepted_value.clone())
            .unwrap_or(own)
    }

    /// Tally an accept. Returns the number of distinct acceptors that
    /// accepted this value.
    pub fn record_accept(&mut self, from: &str, accept: PaxosAcceptMessage) -> usize {
        let unique_id = accept.value.unique_id.clone();
        let sources = self.accept_sources.entry(unique_id.clone()).or_default();
        if sources.insert(from.to_string()) {
            self.accepts.entry(unique_id).or_default().push(accept);
        }
        sources.len()
    }

    pub fn accept_count(&self, unique_id: &str) -> usize {
        self.accept_sources.get(unique_id).map_or(0, HashSet::len)
    }

    /// Whether a waiting proposer can move on.
    pub fn is_ready(&self, quorum: usize) -> bool {
        self.finalized.is_some()
            || (self.phase == ProposerPhase::PrepareSent && self.promises.len() >= quorum)
    }
}

/// Smallest id of the form `paxos_id + k * total_peers` that exceeds `floor`.
pub fn next_proposal_id(paxos_id: u64, total_peers: u64, floor: u64) -> u64 {
    if paxos_id > floor {
        return paxos_id;
    }
    let stride = total_peers.max(1);
    let k = (floor - paxos_id) / stride + 1;
    paxos_id + k * stride
}
