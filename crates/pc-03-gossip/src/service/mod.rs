//! # Service Layer
//!
//! - [`SharedRumorStore`]: rumor log behind its own lock
//! - [`AckTimerRegistry`]: oneshot-backed ack timers
//! - [`GossipService`]: the gossip engine

mod ack_timers;
mod gossip;
mod resend;
mod rumor_store;

pub use ack_timers::AckTimerRegistry;
pub use gossip::GossipService;
pub use rumor_store::SharedRumorStore;
