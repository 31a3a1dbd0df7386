//! Inbound ports (API) for the Gossip subsystem.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{Message, Packet, Rumor, StatusVector};

use crate::domain::{GossipError, OutOfOrderRumor};

/// Gossip operations exposed to the node and to message handlers.
#[async_trait]
pub trait GossipApi: Send + Sync {
    /// Disseminate `msg` to every peer. It is delivered locally before this
    /// returns. Returns the stored rumor.
    async fn broadcast(&self, msg: Message) -> Result<Rumor, GossipError>;

    /// Send `msg` to `dest` through the routing table.
    async fn unicast(&self, dest: &str, msg: Message) -> Result<(), GossipError>;

    /// Process one packet taken off the transport.
    async fn handle_packet(&self, packet: Packet) -> Result<(), GossipError>;
}

/// Per-origin, gapless rumor log.
pub trait RumorStore: Send + Sync {
    /// Append `rumor` if `rumor.sequence == sequence_of(origin) + 1`.
    fn store(&self, rumor: Rumor) -> Result<(), OutOfOrderRumor>;

    /// Rumors of `origin` from zero-based offset `from` (not a sequence).
    fn get_from(&self, origin: &str, from: usize) -> Vec<Rumor>;

    /// Number of rumors stored for `origin`.
    fn sequence_of(&self, origin: &str) -> u64;

    fn status_vector(&self) -> StatusVector;
}

/// Result of waiting on an ack timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// The timer was stopped in time, optionally with a data reply.
    Acked(Option<Vec<u8>>),
    /// The deadline passed, or there was nothing to wait for.
    Expired,
}

/// Deadlines for outstanding packets.
#[async_trait]
pub trait AckTimers: Send + Sync {
    /// Arm a timer for `packet_id` expiring after `timeout`.
    fn set(&self, packet_id: &str, timeout: Duration);

    /// Block until the timer for `packet_id` is stopped or expires.
    ///
    /// Only one waiter is served per timer; further or unknown waits return
    /// [`AckOutcome::Expired`] immediately.
    async fn wait(&self, packet_id: &str) -> AckOutcome;

    /// Stop the timer, handing `data` to the waiter. Returns `false` when no
    /// live timer exists (unknown, already stopped or expired).
    fn stop(&self, packet_id: &str, data: Option<Vec<u8>>) -> bool;
}
