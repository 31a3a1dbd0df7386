use pc_02_chain_storage::ChainError;
use thiserror::Error;

/// Consensus errors returned to the local proposer.
///
/// Stale or mismatched protocol messages from the network are not errors:
/// the handlers simply produce no reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// Another proposer's prepare is already known for this step.
    #[error("Step {step} already has a proposal in progress")]
    ProposalInProgress { step: u64 },

    /// The proposer phase lacks the promises needed to move on.
    #[error("No quorum for step {step}")]
    NoQuorum { step: u64 },

    /// The logical step advanced past the one the caller works on.
    #[error("Step {step} is stale, current step is {current}")]
    StaleStep { step: u64, current: u64 },

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),
}
