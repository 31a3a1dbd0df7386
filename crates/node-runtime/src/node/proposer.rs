//! # Proposer Driver
//!
//! Drives one value through Paxos for the current step.
//!
//! ```text
//! prepare ─→ broadcast ─→ wait ──timeout──→ retry with higher id
//!                          │
//!                     promise quorum
//!                          ↓
//! propose ─→ broadcast ─→ wait ──timeout──→ back to prepare
//!                          │
//!                      finalized ─→ return decided value
//! ```
//!
//! If another proposer already drives the current step, the driver waits for
//! that step to finish and competes in the next one.

use std::time::Duration;

use pc_03_gossip::GossipApi;
use pc_04_consensus::{ConsensusEngine, ConsensusError};
use shared_types::{Message, PaxosPrepareMessage, PaxosValue};
use tracing::{debug, info};

use super::Node;
use crate::errors::NodeError;

impl Node {
    /// Get a value for `filename -> metahash` agreed on by the network.
    ///
    /// Returns the value finalized for the step this proposal took part in,
    /// which is another proposer's value if that one won.
    pub async fn propose(
        &self,
        filename: impl Into<String>,
        metahash: impl Into<String>,
    ) -> Result<PaxosValue, NodeError> {
        let value = PaxosValue::new(filename, metahash);
        let consensus = &self.container.consensus;

        if self.container.config.paxos.total_peers <= 1 {
            let block = consensus.decide_alone(value)?;
            return Ok(block.value);
        }

        loop {
            self.ensure_running()?;
            let step = consensus.current_step();

            let prepare = match consensus.prepare_paxos(step) {
                Ok(prepare) => prepare,
                Err(ConsensusError::StaleStep { .. }) => continue,
                Err(ConsensusError::ProposalInProgress { .. }) => {
                    debug!(peer = %self.local_address(), step, "step driven by another proposer");
                    if consensus.wait_for_next_phase(step, self.backoff()).await
                        || consensus.current_step() != step
                    {
                        continue;
                    }
                    match consensus.retry_prepare(step) {
                        Ok(prepare) => prepare,
                        Err(ConsensusError::StaleStep { .. }) => continue,
                        Err(err) => return Err(err.into()),
                    }
                }
                Err(err) => return Err(err.into()),
            };

            return self.drive_step(step, prepare, value).await;
        }
    }

    async fn drive_step(
        &self,
        step: u64,
        mut prepare: PaxosPrepareMessage,
        value: PaxosValue,
    ) -> Result<PaxosValue, NodeError> {
        let consensus = &self.container.consensus;
        let gossip = &self.container.gossip;

        loop {
            self.ensure_running()?;
            if let Some(decided) = consensus.finalized_value(step) {
                return Ok(self.report(step, decided));
            }

            debug!(peer = %self.local_address(), step, id = prepare.id, "phase 1");
            gossip
                .broadcast(Message::PaxosPrepare(prepare.clone()))
                .await?;

            if consensus.wait_for_next_phase(step, self.backoff()).await {
                if let Some(decided) = consensus.finalized_value(step) {
                    return Ok(self.report(step, decided));
                }

                match consensus.propose_paxos(step, value.clone()) {
                    Ok(propose) => {
                        debug!(peer = %self.local_address(), step, id = propose.id, "phase 2");
                        gossip.broadcast(Message::PaxosPropose(propose)).await?;
                        if consensus.wait_for_next_phase(step, self.backoff()).await {
                            if let Some(decided) = consensus.finalized_value(step) {
                                return Ok(self.report(step, decided));
                            }
                        }
                    }
                    Err(ConsensusError::NoQuorum { .. }) => {}
                    Err(ConsensusError::StaleStep { .. }) => return self.decided(step),
                    Err(err) => return Err(err.into()),
                }
            }

            prepare = match consensus.retry_prepare(step) {
                Ok(prepare) => prepare,
                Err(ConsensusError::StaleStep { .. }) => return self.decided(step),
                Err(err) => return Err(err.into()),
            };
        }
    }

    fn decided(&self, step: u64) -> Result<PaxosValue, NodeError> {
        let consensus = &self.container.consensus;
        match consensus.finalized_value(step) {
            Some(decided) => Ok(self.report(step, decided)),
            None => Err(ConsensusError::StaleStep {
                step,
                current: consensus.current_step(),
            }
            .into()),
        }
    }

    fn report(&self, step: u64, decided: PaxosValue) -> PaxosValue {
        info!(
            peer = %self.local_address(),
            step,
            unique_id = %decided.unique_id,
            filename = %decided.filename,
            "proposal settled"
        );
        decided
    }

    /// Phase wait: the configured retry plus a random extra of up to half.
    fn backoff(&self) -> Duration {
        let retry = self.container.config.paxos.proposer_retry;
        retry + retry.mul_f64(rand::random::<f64>() * 0.5)
    }
}
