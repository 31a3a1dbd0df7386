//! JSON wire codec for [`Packet`].

use crate::errors::SerializationError;
use crate::packet::Packet;

/// Largest encoded packet a datagram transport will carry.
pub const MAX_PACKET_SIZE: usize = 65_000;

pub fn encode_packet(packet: &Packet) -> Result<Vec<u8>, SerializationError> {
    Ok(serde_json::to_vec(packet)?)
}

pub fn decode_packet(bytes: &[u8]) -> Result<Packet, SerializationError> {
    Ok(serde_json::from_slice(bytes)?)
}
