//! # Ports Layer
//!
//! - **Driving Ports (Inbound):** [`inbound::GossipApi`], plus the two
//!   internally synchronized components the engine is built from,
//!   [`inbound::RumorStore`] and [`inbound::AckTimers`].
//! - **Driven Ports (Outbound):** [`outbound::Transport`] and
//!   [`outbound::MessageHandler`].

pub mod inbound;
pub mod outbound;

pub use inbound::{AckOutcome, AckTimers, GossipApi, RumorStore};
pub use outbound::{MessageHandler, Transport};
