//! # Packet
//!
//! The unit sent over a transport: a routing [`Header`] plus one [`Message`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Address;
use crate::messages::Message;

/// Routing metadata carried by every packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Unique id, referenced by acks.
    pub packet_id: String,
    /// Node that created the message.
    pub source: Address,
    /// Node that last forwarded the packet.
    pub relayed_by: Address,
    /// Final destination.
    pub destination: Address,
    /// Number of relays so far.
    pub hop_count: u32,
}

impl Header {
    /// Create a header with a fresh packet id.
    pub fn new(
        source: impl Into<Address>,
        relayed_by: impl Into<Address>,
        destination: impl Into<Address>,
    ) -> Self {
        Self {
            packet_id: Uuid::new_v4().to_string(),
            source: source.into(),
            relayed_by: relayed_by.into(),
            destination: destination.into(),
            hop_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub header: Header,
    pub msg: Message,
}

impl Packet {
    pub fn new(header: Header, msg: Message) -> Self {
        Self { header, msg }
    }

    /// Copy of this packet as relayed by `relayer`; the packet id is kept.
    pub fn relayed(&self, relayer: impl Into<Address>) -> Self {
        let mut copy = self.clone();
        copy.header.relayed_by = relayer.into();
        copy.header.hop_count = copy.header.hop_count.saturating_add(1);
        copy
    }
}
