//! # Gossip Service
//!
//! Rumor mongering with acknowledged delivery, anti-entropy and forwarding.
//!
//! ## Flow
//!
//! ```text
//! broadcast(msg) ─→ store rumor ─→ deliver locally ─→ send to 1 neighbor
//!                                                        │
//!                                        ack timer ──────┘ (resend on expiry)
//!
//! recv Rumors ─→ route update ─→ store ─→ deliver ─→ ack source ─→ forward
//! recv Ack    ─→ stop timer ─→ compare status
//! recv Status ─→ compare status ─→ push rumors | send status | keep mongering
//! ```
//!
//! Each component (routing, rumors, timers, handlers) has its own lock. No
//! lock is held across an `.await`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::{Mutex, RwLock};
use pc_01_routing::RoutingTable;
use shared_types::{
    AckMessage, Address, Header, Message, MessageKind, Packet, PrivateMessage, Rumor,
    RumorsMessage, StatusVector,
};
use tracing::{debug, info, warn};

use super::resend::AckResender;
use crate::domain::{compare_status, GossipConfig, GossipError, StatusComparison};
use crate::ports::inbound::{AckTimers, GossipApi, RumorStore};
use crate::ports::outbound::{MessageHandler, Transport};

pub struct GossipService {
    local: Address,
    config: GossipConfig,
    routing: Arc<dyn RoutingTable>,
    rumors: Arc<dyn RumorStore>,
    acks: Arc<dyn AckTimers>,
    transport: Arc<dyn Transport>,
    handlers: RwLock<HashMap<MessageKind, Arc<dyn MessageHandler>>>,
    /// Serializes sequence assignment of local rumors.
    broadcast_lock: Mutex<()>,
}

impl GossipService {
    pub fn new(
        config: GossipConfig,
        routing: Arc<dyn RoutingTable>,
        rumors: Arc<dyn RumorStore>,
        acks: Arc<dyn AckTimers>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            local: transport.local_address(),
            config,
            routing,
            rumors,
            acks,
            transport,
            handlers: RwLock::new(HashMap::new()),
            broadcast_lock: Mutex::new(()),
        }
    }

    pub fn local_address(&self) -> &Address {
        &self.local
    }

    pub fn config(&self) -> &GossipConfig {
        &self.config
    }

    pub fn routing(&self) -> &Arc<dyn RoutingTable> {
        &self.routing
    }

    pub fn rumors(&self) -> &Arc<dyn RumorStore> {
        &self.rumors
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Route messages of `kind` to `handler`, replacing any previous one.
    pub fn register_handler(&self, kind: MessageKind, handler: Arc<dyn MessageHandler>) {
        self.handlers.write().insert(kind, handler);
    }

    pub fn register_handlers(&self, kinds: &[MessageKind], handler: Arc<dyn MessageHandler>) {
        let mut handlers = self.handlers.write();
        for kind in kinds {
            handlers.insert(*kind, Arc::clone(&handler));
        }
    }

    /// Deliver `msg` to this node as if it had arrived with `header`.
    pub fn dispatch(&self, msg: Message, header: Header) -> BoxFuture<'_, Result<(), GossipError>> {
        async move {
            match msg {
                Message::Rumors(rumors) => self.handle_rumors(header, rumors).await,
                Message::Ack(ack) => self.handle_ack(header, ack).await,
                Message::Status(status) => self.handle_status(&header.source, &status.0).await,
                Message::Private(private) => self.handle_private(header, private).await,
                other => self.handle_registered(other, header).await,
            }
        }
        .boxed()
    }

    async fn handle_registered(&self, msg: Message, header: Header) -> Result<(), GossipError> {
        let kind = msg.kind();
        let handler = self.handlers.read().get(&kind).cloned();
        if let Some(handler) = handler {
            return handler.handle(msg, header).await;
        }

        match msg {
            Message::Chat(chat) => {
                info!(peer = %self.local, from = %header.source, message = %chat.message, "chat message");
                Ok(())
            }
            Message::Empty(_) => {
                debug!(peer = %self.local, from = %header.source, "heartbeat");
                Ok(())
            }
            _ => Err(GossipError::NoHandler(kind)),
        }
    }

    async fn handle_private(
        &self,
        header: Header,
        private: PrivateMessage,
    ) -> Result<(), GossipError> {
        if !private.recipients.contains(&self.local) {
            debug!(peer = %self.local, from = %header.source, "private message for other peers dropped");
            return Ok(());
        }
        self.dispatch(*private.msg, header).await
    }

    async fn handle_rumors(&self, header: Header, batch: RumorsMessage) -> Result<(), GossipError> {
        debug!(peer = %self.local, from = %header.source, count = batch.rumors.len(), "rumors received");

        let mut forward = false;
        for rumor in &batch.rumors {
            if rumor.origin != self.local {
                self.routing
                    .set_entry(rumor.origin.clone(), header.relayed_by.clone());
            }

            if let Err(err) = self.rumors.store(rumor.clone()) {
                debug!(peer = %self.local, error = %err, "rumor skipped");
                continue;
            }
            forward = true;

            let inner = Header {
                packet_id: header.packet_id.clone(),
                source: rumor.origin.clone(),
                relayed_by: header.relayed_by.clone(),
                destination: self.local.clone(),
                hop_count: header.hop_count,
            };
            if let Err(err) = self.dispatch(rumor.msg.clone(), inner).await {
                warn!(
                    peer = %self.local,
                    origin = %rumor.origin,
                    sequence = rumor.sequence,
                    error = %err,
                    "rumor payload not processed"
                );
            }
        }

        if let Err(err) = self.send_ack(&header).await {
            warn!(peer = %self.local, to = %header.source, error = %err, "ack not sent");
        }

        if forward {
            let excluding: HashSet<Address> = HashSet::from([header.source.clone()]);
            match self.routing.random_neighbor(&excluding) {
                Some(neighbor) => {
                    if let Err(err) = self.send_direct(&neighbor, Message::Rumors(batch)).await {
                        warn!(peer = %self.local, to = %neighbor, error = %err, "rumor forward failed");
                    }
                }
                None => debug!(peer = %self.local, "no neighbor to forward rumors to"),
            }
        }
        Ok(())
    }

    async fn handle_ack(&self, header: Header, ack: AckMessage) -> Result<(), GossipError> {
        if !self.acks.stop(&ack.acked_packet_id, None) {
            debug!(peer = %self.local, packet_id = %ack.acked_packet_id, "ack without live timer");
        }
        self.handle_status(&header.source, &ack.status).await
    }

    /// Anti-entropy: reconcile with `source`, whose status is `remote`.
    pub async fn handle_status(
        &self,
        source: &str,
        remote: &StatusVector,
    ) -> Result<(), GossipError> {
        let local = self.rumors.status_vector();

        match compare_status(&local, remote) {
            StatusComparison::Ahead {
                origin,
                remote_count,
            } => {
                let missing = self.rumors.get_from(&origin, remote_count as usize);
                debug!(peer = %self.local, to = %source, %origin, count = missing.len(), "pushing missing rumors");
                self.send_direct(source, Message::Rumors(RumorsMessage { rumors: missing }))
                    .await?;
            }
            StatusComparison::Behind { origin } => {
                debug!(peer = %self.local, to = %source, %origin, "requesting missing rumors");
                self.send_status(source).await?;
            }
            StatusComparison::InSync => {
                let roll: f64 = rand::random();
                if roll < self.config.continue_mongering {
                    if let Err(err) = self.send_status_to_random_neighbor(&[source]).await {
                        debug!(peer = %self.local, error = %err, "mongering stopped");
                    }
                }
            }
        }
        Ok(())
    }

    async fn send_ack(&self, header: &Header) -> Result<(), GossipError> {
        let ack = AckMessage {
            acked_packet_id: header.packet_id.clone(),
            status: self.rumors.status_vector(),
        };
        self.send_direct(&header.source, Message::Ack(ack)).await?;
        Ok(())
    }

    /// Send our status vector to `dest`.
    pub async fn send_status(&self, dest: &str) -> Result<(), GossipError> {
        self.send_direct(dest, Message::status(self.rumors.status_vector()))
            .await?;
        Ok(())
    }

    /// Send our status to a random neighbor other than `excluding`.
    pub async fn send_status_to_random_neighbor(
        &self,
        excluding: &[&str],
    ) -> Result<Address, GossipError> {
        let excluded: HashSet<Address> = excluding.iter().map(|a| a.to_string()).collect();
        let neighbor = self
            .routing
            .random_neighbor(&excluded)
            .ok_or(GossipError::NoNeighbor)?;
        self.send_status(&neighbor).await?;
        Ok(neighbor)
    }

    /// Anti-entropy tick.
    pub async fn anti_entropy(&self) -> Result<Address, GossipError> {
        self.send_status_to_random_neighbor(&[]).await
    }

    /// Heartbeat tick: broadcast an empty message.
    pub async fn heartbeat(&self) -> Result<Rumor, GossipError> {
        self.broadcast(Message::empty()).await
    }

    /// Send `msg` straight to `dest`, bypassing the routing table.
    async fn send_direct(&self, dest: &str, msg: Message) -> Result<Packet, GossipError> {
        let packet = Packet::new(Header::new(&self.local, &self.local, dest), msg);
        self.transport
            .send(dest, packet.clone(), Duration::ZERO)
            .await?;
        Ok(packet)
    }

    /// Relay a packet addressed to another node.
    async fn forward(&self, packet: Packet) -> Result<(), GossipError> {
        let relay = match self.routing.route(&packet.header.destination) {
            Ok(relay) => relay,
            Err(err) => {
                warn!(peer = %self.local, dest = %packet.header.destination, "cannot forward packet: no route");
                return Err(err.into());
            }
        };
        let relayed = packet.relayed(self.local.clone());
        self.transport.send(&relay, relayed, Duration::ZERO).await?;
        Ok(())
    }

    fn append_local_rumor(&self, msg: Message) -> Result<Rumor, GossipError> {
        let _guard = self.broadcast_lock.lock();
        let rumor = Rumor {
            origin: self.local.clone(),
            sequence: self.rumors.sequence_of(&self.local) + 1,
            msg,
        };
        self.rumors.store(rumor.clone())?;
        Ok(rumor)
    }

    fn resender(&self) -> AckResender {
        AckResender {
            local: self.local.clone(),
            ack_timeout: self.config.ack_timeout,
            routing: Arc::clone(&self.routing),
            acks: Arc::clone(&self.acks),
            transport: Arc::clone(&self.transport),
        }
    }
}

#[async_trait]
impl GossipApi for GossipService {
    async fn broadcast(&self, msg: Message) -> Result<Rumor, GossipError> {
        let rumor = self.append_local_rumor(msg.clone())?;
        debug!(peer = %self.local, sequence = rumor.sequence, kind = %msg.kind(), "broadcasting");

        let local_header = Header::new(&self.local, &self.local, &self.local);
        if let Err(err) = self.dispatch(msg, local_header).await {
            warn!(peer = %self.local, error = %err, "local delivery failed");
        }

        let Some(neighbor) = self.routing.random_neighbor(&HashSet::new()) else {
            warn!(peer = %self.local, "no neighbor to broadcast to");
            return Ok(rumor);
        };

        let packet = Packet::new(
            Header::new(&self.local, &self.local, &neighbor),
            Message::Rumors(RumorsMessage {
                rumors: vec![rumor.clone()],
            }),
        );
        let packet_id = packet.header.packet_id.clone();

        if self.config.acks_enabled() {
            self.acks.set(&packet_id, self.config.ack_timeout);
        }
        if let Err(err) = self.transport.send(&neighbor, packet, Duration::ZERO).await {
            warn!(peer = %self.local, to = %neighbor, error = %err, "broadcast send failed");
        }
        if self.config.acks_enabled() {
            tokio::spawn(
                self.resender()
                    .run(packet_id, neighbor, vec![rumor.clone()]),
            );
        }

        Ok(rumor)
    }

    async fn unicast(&self, dest: &str, msg: Message) -> Result<(), GossipError> {
        let relay = self.routing.route(dest)?;
        let packet = Packet::new(Header::new(&self.local, &self.local, dest), msg);
        self.transport.send(&relay, packet, Duration::ZERO).await?;
        Ok(())
    }

    async fn handle_packet(&self, packet: Packet) -> Result<(), GossipError> {
        if packet.header.destination != self.local {
            return self.forward(packet).await;
        }
        self.dispatch(packet.msg, packet.header).await
    }
}
