//! # Multi-Paxos Service
//!
//! One [`PaxosInstance`] per logical step, created on first reference. The
//! step equals the chain length: finalizing a value appends its block and
//! moves to the next step.
//!
//! All instance state sits behind a single `parking_lot::RwLock` owned by this
//! component. The chain store is only called with that lock held, so the
//! lock order is always consensus then chain.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use pc_02_chain_storage::ChainStore;
use shared_types::{
    Address, Block, Message, PaxosAcceptMessage, PaxosPrepareMessage, PaxosPromiseMessage,
    PaxosProposeMessage, PaxosValue, TlcMessage,
};
use tracing::{debug, info};

use crate::domain::{
    next_proposal_id, ConsensusError, PaxosConfig, PaxosInstance, ProposerPhase,
};
use crate::ports::inbound::ConsensusEngine;

#[derive(Debug, Default)]
struct PaxosState {
    step: u64,
    instances: HashMap<u64, PaxosInstance>,
    /// TLC announcements for steps ahead of ours, applied in order.
    pending_tlc: BTreeMap<u64, TlcMessage>,
}

impl PaxosState {
    fn instance(&mut self, step: u64) -> &mut PaxosInstance {
        self.instances.entry(step).or_default()
    }

    fn check_step(&self, step: u64) -> Result<(), ConsensusError> {
        if step != self.step {
            return Err(ConsensusError::StaleStep {
                step,
                current: self.step,
            });
        }
        Ok(())
    }
}

pub struct MultiPaxos {
    local: Address,
    config: PaxosConfig,
    chain: Arc<dyn ChainStore>,
    state: RwLock<PaxosState>,
}

impl MultiPaxos {
    /// Create the engine, resuming at the step after the last stored block.
    pub fn new(
        local: impl Into<Address>,
        config: PaxosConfig,
        chain: Arc<dyn ChainStore>,
    ) -> Result<Self, ConsensusError> {
        let step = chain.length()?;
        Ok(Self {
            local: local.into(),
            config,
            chain,
            state: RwLock::new(PaxosState {
                step,
                ..PaxosState::default()
            }),
        })
    }

    pub fn config(&self) -> &PaxosConfig {
        &self.config
    }

    pub fn chain(&self) -> &Arc<dyn ChainStore> {
        &self.chain
    }

    fn quorum(&self) -> usize {
        self.config.quorum()
    }

    fn is_ready(&self, step: u64) -> bool {
        let state = self.state.read();
        if step < state.step {
            return true;
        }
        state
            .instances
            .get(&step)
            .is_some_and(|instance| instance.is_ready(self.quorum()))
    }

    fn complete_step(&self, state: &mut PaxosState, step: u64, value: PaxosValue) {
        let instance = state.instance(step);
        instance.finalized = Some(value);
        instance.notify.notify_waiters();
        state.step = step + 1;
    }

    /// Mint and append the block for the current step, then advance.
    fn finalize(
        &self,
        state: &mut PaxosState,
        value: PaxosValue,
    ) -> Result<Vec<Message>, ConsensusError> {
        let step = state.step;
        let block = self.chain.mint_block(value.clone())?;
        self.chain.add_block(block.clone())?;
        info!(
            peer = %self.local,
            step,
            unique_id = %value.unique_id,
            filename = %value.filename,
            "value finalized"
        );
        self.complete_step(state, step, value);

        let mut out = vec![Message::Tlc(TlcMessage { step, block })];
        out.extend(self.drain_pending(state)?);
        Ok(out)
    }

    /// Append a block finalized elsewhere for the current step.
    fn apply_tlc(
        &self,
        state: &mut PaxosState,
        tlc: TlcMessage,
    ) -> Result<Vec<Message>, ConsensusError> {
        self.chain.add_block(tlc.block.clone())?;
        info!(
            peer = %self.local,
            step = tlc.step,
            unique_id = %tlc.block.value.unique_id,
            "caught up from TLC"
        );
        self.complete_step(state, tlc.step, tlc.block.value.clone());
        Ok(vec![Message::Tlc(tlc)])
    }

    fn drain_pending(&self, state: &mut PaxosState) -> Result<Vec<Message>, ConsensusError> {
        let mut out = Vec::new();
        loop {
            let current = state.step;
            let Some(entry) = state.pending_tlc.first_entry() else {
                break;
            };
            let step = *entry.key();
            if step > current {
                break;
            }
            let tlc = entry.remove();
            if step == current {
                out.extend(self.apply_tlc(state, tlc)?);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl ConsensusEngine for MultiPaxos {
    fn current_step(&self) -> u64 {
        self.state.read().step
    }

    fn prepare_paxos(&self, step: u64) -> Result<PaxosPrepareMessage, ConsensusError> {
        let mut state = self.state.write();
        state.check_step(step)?;

        let instance = state.instance(step);
        if instance.max_id != 0 || instance.phase != ProposerPhase::Idle {
            return Err(ConsensusError::ProposalInProgress { step });
        }
        let id = self.config.paxos_id;
        instance.begin_prepare(id);

        debug!(peer = %self.local, step, id, "prepare");
        Ok(PaxosPrepareMessage {
            step,
            id,
            source: self.local.clone(),
        })
    }

    fn retry_prepare(&self, step: u64) -> Result<PaxosPrepareMessage, ConsensusError> {
        let mut state = self.state.write();
        state.check_step(step)?;

        let instance = state.instance(step);
        let floor = instance.max_id.max(instance.proposed_id);
        let id = next_proposal_id(self.config.paxos_id, self.config.total_peers, floor);
        instance.begin_prepare(id);

        debug!(peer = %self.local, step, id, "prepare retry");
        Ok(PaxosPrepareMessage {
            step,
            id,
            source: self.local.clone(),
        })
    }

    fn propose_paxos(
        &self,
        step: u64,
        value: PaxosValue,
    ) -> Result<PaxosProposeMessage, ConsensusError> {
        let quorum = self.quorum();
        let mut state = self.state.write();
        state.check_step(step)?;

        let instance = state.instance(step);
        if instance.phase != ProposerPhase::PrepareSent || instance.promises.len() < quorum {
            return Err(ConsensusError::NoQuorum { step });
        }
        let value = instance.choose_value(value);
        instance.phase = ProposerPhase::ProposeSent;

        debug!(peer = %self.local, step, id = instance.proposed_id, unique_id = %value.unique_id, "propose");
        Ok(PaxosProposeMessage {
            step,
            id: instance.proposed_id,
            value,
        })
    }

    fn handle_prepare(&self, prepare: &PaxosPrepareMessage) -> Option<Message> {
        let mut state = self.state.write();
        if prepare.step != state.step {
            debug!(peer = %self.local, step = prepare.step, current = state.step, "prepare for other step ignored");
            return None;
        }

        let instance = state.instance(prepare.step);
        let Some((accepted_id, accepted_value)) = instance.promise(prepare.id) else {
            debug!(peer = %self.local, id = prepare.id, max_id = instance.max_id, "stale prepare ignored");
            return None;
        };

        Some(Message::private(
            [prepare.source.clone()],
            Message::PaxosPromise(PaxosPromiseMessage {
                step: prepare.step,
                id: prepare.id,
                accepted_id,
                accepted_value,
            }),
        ))
    }

    fn handle_promise(&self, from: &str, promise: &PaxosPromiseMessage) -> bool {
        let quorum = self.quorum();
        let mut state = self.state.write();
        if promise.step != state.step {
            return false;
        }

        let instance = state.instance(promise.step);
        match instance.record_promise(from, promise.clone()) {
            Some(count) if count >= quorum => {
                instance.notify.notify_waiters();
                count == quorum
            }
            _ => false,
        }
    }

    fn handle_propose(&self, propose: &PaxosProposeMessage) -> Option<PaxosAcceptMessage> {
        let mut state = self.state.write();
        if propose.step != state.step {
            return None;
        }

        let instance = state.instance(propose.step);
        if !instance.accept(propose.id, &propose.value) {
            debug!(peer = %self.local, id = propose.id, max_id = instance.max_id, "propose rejected");
            return None;
        }

        Some(PaxosAcceptMessage {
            step: propose.step,
            id: propose.id,
            value: propose.value.clone(),
        })
    }

    fn handle_accept(
        &self,
        from: &str,
        accept: &PaxosAcceptMessage,
    ) -> Result<Vec<Message>, ConsensusError> {
        let quorum = self.quorum();
        let mut guard = self.state.write();
        let state = &mut *guard;
        if accept.step != state.step {
            return Ok(Vec::new());
        }

        let instance = state.instance(accept.step);
        if instance.finalized.is_some() {
            return Ok(Vec::new());
        }
        if instance.record_accept(from, accept.clone()) < quorum {
            return Ok(Vec::new());
        }
        self.finalize(state, accept.value.clone())
    }

    fn handle_tlc(&self, tlc: &TlcMessage) -> Result<Vec<Message>, ConsensusError> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        if tlc.step < state.step {
            return Ok(Vec::new());
        }
        if tlc.step > state.step {
            debug!(peer = %self.local, step = tlc.step, current = state.step, "TLC buffered");
            state
                .pending_tlc
                .entry(tlc.step)
                .or_insert_with(|| tlc.clone());
            return Ok(Vec::new());
        }

        let mut out = self.apply_tlc(state, tlc.clone())?;
        out.extend(self.drain_pending(state)?);
        Ok(out)
    }

    fn finalized_value(&self, step: u64) -> Option<PaxosValue> {
        self.state
            .read()
            .instances
            .get(&step)
            .and_then(|instance| instance.finalized.clone())
    }

    fn decide_alone(&self, value: PaxosValue) -> Result<Block, ConsensusError> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let step = state.step;

        let block = self.chain.mint_block(value.clone())?;
        self.chain.add_block(block.clone())?;
        info!(peer = %self.local, step, unique_id = %value.unique_id, "value decided locally");
        self.complete_step(state, step, value);
        Ok(block)
    }

    async fn wait_for_next_phase(&self, step: u64, timeout: Duration) -> bool {
        let notify = {
            let mut state = self.state.write();
            if step < state.step {
                return true;
            }
            Arc::clone(&state.instance(step).notify)
        };

        let notified = notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_ready(step) {
            return true;
        }
        tokio::time::timeout(timeout, notified).await.is_ok()
    }
}
