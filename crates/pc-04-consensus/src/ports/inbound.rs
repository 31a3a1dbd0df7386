//! Inbound ports (API) for the Consensus subsystem.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{
    Block, Message, PaxosAcceptMessage, PaxosPrepareMessage, PaxosPromiseMessage,
    PaxosProposeMessage, PaxosValue, TlcMessage,
};

use crate::domain::ConsensusError;

/// Multi-instance Paxos gated by a logical step.
///
/// Handlers never perform I/O: they return the messages the caller must
/// broadcast. A handler returning nothing means the message was stale or
/// rejected, which is expected under asynchronous delivery.
#[async_trait]
pub trait ConsensusEngine: Send + Sync {
    /// The step (block index) currently being decided.
    fn current_step(&self) -> u64;

    /// Start proposing in `step` with this node's first id.
    ///
    /// Fails with `ProposalInProgress` if a prepare for `step` is already
    /// known to this node.
    fn prepare_paxos(&self, step: u64) -> Result<PaxosPrepareMessage, ConsensusError>;

    /// Restart phase 1 of `step` with an id above every id seen so far.
    fn retry_prepare(&self, step: u64) -> Result<PaxosPrepareMessage, ConsensusError>;

    /// Enter phase 2 of `step` after a promise quorum. The proposed value is
    /// an already accepted one reported by the promises, if any, else `value`.
    fn propose_paxos(
        &self,
        step: u64,
        value: PaxosValue,
    ) -> Result<PaxosProposeMessage, ConsensusError>;

    /// Acceptor: returns the promise to send, wrapped for the proposer only.
    fn handle_prepare(&self, prepare: &PaxosPrepareMessage) -> Option<Message>;

    /// Proposer: tally a promise from `from`. Returns `true` when this
    /// promise completed the quorum.
    fn handle_promise(&self, from: &str, promise: &PaxosPromiseMessage) -> bool;

    /// Acceptor: returns the accept to broadcast.
    fn handle_propose(&self, propose: &PaxosProposeMessage) -> Option<PaxosAcceptMessage>;

    /// Tally an accept from `from`. On quorum the value is finalized, its
    /// block appended and the step advanced; the returned messages (TLC
    /// announcements) must be broadcast.
    fn handle_accept(
        &self,
        from: &str,
        accept: &PaxosAcceptMessage,
    ) -> Result<Vec<Message>, ConsensusError>;

    /// Catch up on a step finalized elsewhere. Returns the TLC messages to
    /// re-broadcast.
    fn handle_tlc(&self, tlc: &TlcMessage) -> Result<Vec<Message>, ConsensusError>;

    /// Value finalized for `step`, if known.
    fn finalized_value(&self, step: u64) -> Option<PaxosValue>;

    /// Finalize `value` for the current step without a network round. Only
    /// meaningful when this node is the only participant.
    fn decide_alone(&self, value: PaxosValue) -> Result<Block, ConsensusError>;

    /// Wait until `step` reaches promise quorum (while preparing) or is
    /// finalized. Returns `false` if `timeout` elapsed first.
    async fn wait_for_next_phase(&self, step: u64, timeout: Duration) -> bool;
}
