//! # Gossip Subsystem (pc-03)
//!
//! Epidemic dissemination of messages ("rumors") to every peer.
//!
//! ## Architecture Role
//!
//! ```text
//! [Transport] ──Packet──→ [Gossip (3)] ──dispatch by MessageKind──→ [Handlers]
//!                              │                                     (consensus)
//!                              ├── RumorStore     (per-origin log)
//!                              ├── AckTimers      (reliable delivery)
//!                              └── RoutingTable   (pc-01)
//! ```
//!
//! ## Delivery Guarantees
//!
//! - At-least-once: a broadcast is resent to another neighbor until acked.
//! - Duplicates are suppressed by the gapless per-origin sequence check.
//! - Per-origin delivery is in sequence order; cross-origin order is
//!   unspecified.
//! - Missed rumors are repaired by anti-entropy status exchanges.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    compare_status, GossipConfig, GossipError, OutOfOrderRumor, RumorLog, StatusComparison,
    TransportError,
};
pub use ports::{AckOutcome, AckTimers, GossipApi, MessageHandler, RumorStore, Transport};
pub use service::{AckTimerRegistry, GossipService, SharedRumorStore};
