//! Background resend of an unacknowledged rumor batch.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use pc_01_routing::RoutingTable;
use shared_types::{Address, Header, Message, Packet, Rumor, RumorsMessage};
use tracing::{debug, warn};

use crate::ports::inbound::{AckOutcome, AckTimers};
use crate::ports::outbound::Transport;

/// Everything the resend task needs, detached from the service so the task
/// owns its handles.
pub(crate) struct AckResender {
    pub(crate) local: Address,
    pub(crate) ack_timeout: Duration,
    pub(crate) routing: Arc<dyn RoutingTable>,
    pub(crate) acks: Arc<dyn AckTimers>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl AckResender {
    /// Wait for the ack of `packet_id`; on expiry resend `rumors` to another
    /// neighbor than the previous destination, until acked or no neighbor
    /// remains.
    pub(crate) async fn run(self, mut packet_id: String, mut dest: Address, rumors: Vec<Rumor>) {
        loop {
            if let AckOutcome::Acked(_) = self.acks.wait(&packet_id).await {
                debug!(peer = %self.local, %packet_id, from = %dest, "rumor acknowledged");
                return;
            }

            let excluding: HashSet<Address> = HashSet::from([dest.clone()]);
            let Some(next) = self.routing.random_neighbor(&excluding) else {
                warn!(peer = %self.local, %packet_id, "ack timed out and no other neighbor left, giving up resend");
                return;
            };

            let packet = Packet::new(
                Header::new(&self.local, &self.local, &next),
                Message::Rumors(RumorsMessage {
                    rumors: rumors.clone(),
                }),
            );
            debug!(peer = %self.local, expired = %packet_id, to = %next, "resending rumors");

            self.acks.set(&packet.header.packet_id, self.ack_timeout);
            packet_id = packet.header.packet_id.clone();
            if let Err(err) = self.transport.send(&next, packet, Duration::ZERO).await {
                warn!(peer = %self.local, to = %next, error = %err, "resend failed");
            }
            dest = next;
        }
    }
}
