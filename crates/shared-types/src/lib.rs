//! # Shared Types Crate
//!
//! This crate contains the entities and wire messages exchanged between
//! Peerchain nodes and between the subsystems of a single node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a subsystem or network
//!   boundary is defined here.
//! - **Tagged Dispatch**: [`Message`] is a closed enum; its [`MessageKind`] tag
//!   doubles as the wire `type` field, so dispatch is a `match`, never a lookup
//!   by reflection.
//! - **Opaque Transport**: a [`Packet`] is a [`Header`] plus one [`Message`];
//!   how the packet is framed on the wire is the transport's concern, the
//!   [`codec`] module only guarantees a lossless JSON round trip.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod messages;
pub mod packet;

pub use entities::*;
pub use errors::*;
pub use messages::*;
pub use packet::{Header, Packet};
