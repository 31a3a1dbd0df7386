//! # Consensus Subsystem (pc-04)
//!
//! Multi-instance Paxos: one Synod instance per logical step, where the step
//! is the index of the next block. Deciding a value appends its block to the
//! chain and opens the next step.
//!
//! ## Architecture Role
//!
//! ```text
//! [Gossip (3)] ──Prepare/Propose/Accept/TLC──→ [Consensus (4)] ──add_block──→ [Chain Storage (2)]
//!       ↑                                            │
//!       └────────── messages to broadcast ───────────┘
//! ```
//!
//! ## Message Flow
//!
//! | Message | Sender | Receiver reaction |
//! |---------|--------|-------------------|
//! | `PaxosPrepare` | proposer | promise if `id > max_id`, sent privately |
//! | `PaxosPromise` | acceptor | proposer tallies per acceptor |
//! | `PaxosPropose` | proposer | accept if `id == max_id`, broadcast |
//! | `PaxosAccept` | acceptor | everyone tallies per value; quorum finalizes |
//! | `TLC` | finalizer | late nodes append the block and re-broadcast once |
//!
//! The engine performs no I/O. Handlers return what must be sent and the
//! node runtime broadcasts it through gossip.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    majority, next_proposal_id, ConsensusError, PaxosConfig, PaxosInstance, ProposerPhase,
    ThresholdFn,
};
pub use ports::inbound::ConsensusEngine;
pub use service::MultiPaxos;
