//! # Consensus Message Handler
//!
//! Bridges gossip delivery to the consensus engine. The engine never does I/O;
//! whatever it returns is broadcast back through gossip.
//!
//! | Delivered | Engine call | Broadcast |
//! |-----------|-------------|-----------|
//! | `PaxosPrepare` | `handle_prepare` | private promise to the proposer |
//! | `PaxosPromise` | `handle_promise(origin)` | nothing |
//! | `PaxosPropose` | `handle_propose` | `PaxosAccept` |
//! | `PaxosAccept` | `handle_accept(origin)` | `TLC` on quorum |
//! | `TLC` | `handle_tlc` | the TLC, once |

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use pc_03_gossip::{GossipApi, GossipError, MessageHandler};
use pc_04_consensus::ConsensusEngine;
use shared_types::{Address, Header, Message};
use tracing::{debug, warn};

pub struct ConsensusHandler {
    local: Address,
    engine: Arc<dyn ConsensusEngine>,
    /// Gossip owns this handler through its registry.
    gossip: Weak<dyn GossipApi>,
}

impl ConsensusHandler {
    pub fn new(
        local: impl Into<Address>,
        engine: Arc<dyn ConsensusEngine>,
        gossip: Weak<dyn GossipApi>,
    ) -> Self {
        Self {
            local: local.into(),
            engine,
            gossip,
        }
    }

    async fn broadcast_all(&self, messages: Vec<Message>) -> Result<(), GossipError> {
        if messages.is_empty() {
            return Ok(());
        }
        let Some(gossip) = self.gossip.upgrade() else {
            debug!(peer = %self.local, "gossip gone, consensus output dropped");
            return Ok(());
        };
        for msg in messages {
            gossip.broadcast(msg).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for ConsensusHandler {
    async fn handle(&self, msg: Message, header: Header) -> Result<(), GossipError> {
        let outgoing = match msg {
            Message::PaxosPrepare(prepare) => self.engine.handle_prepare(&prepare).into_iter().collect(),
            Message::PaxosPromise(promise) => {
                if self.engine.handle_promise(&header.source, &promise) {
                    debug!(peer = %self.local, step = promise.step, id = promise.id, "promise quorum reached");
                }
                Vec::new()
            }
            Message::PaxosPropose(propose) => self
                .engine
                .handle_propose(&propose)
                .map(Message::PaxosAccept)
                .into_iter()
                .collect(),
            Message::PaxosAccept(accept) => self
                .engine
                .handle_accept(&header.source, &accept)
                .map_err(|err| {
                    warn!(peer = %self.local, step = accept.step, error = %err, "accept not applied");
                    GossipError::Handler(err.to_string())
                })?,
            Message::Tlc(tlc) => self.engine.handle_tlc(&tlc).map_err(|err| {
                warn!(peer = %self.local, step = tlc.step, error = %err, "TLC not applied");
                GossipError::Handler(err.to_string())
            })?,
            other => return Err(GossipError::NoHandler(other.kind())),
        };
        self.broadcast_all(outgoing).await
    }
}
