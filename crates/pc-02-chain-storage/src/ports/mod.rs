//! # Ports Layer
//!
//! - **Inbound:** [`inbound::ChainStore`], the API consensus uses to mint and
//!   append blocks.
//! - **Outbound:** [`outbound::KeyValueStore`] and [`outbound::BlockSerializer`],
//!   supplied by the host.

pub mod inbound;
pub mod outbound;
