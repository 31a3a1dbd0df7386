//! # Routing Subsystem (pc-01)
//!
//! Maps every known origin address to the next-hop (relay) address used to
//! reach it, and picks random neighbors for gossip fan-out.
//!
//! ## Architecture Role
//!
//! ```text
//! [Gossip (3)] ──set_entry(origin, relayed_by)──→ [Routing (1)]
//!      │                                               │
//!      └──────── route(dest) / random_neighbor ←───────┘
//! ```
//!
//! ## Invariants
//!
//! - A direct neighbor maps to itself and is never downgraded to a relayed
//!   route by `set_entry`.
//! - The node's own entry is fixed at construction.
//! - Callers only ever see copies of the table.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{RoutingError, RoutingState};
pub use ports::inbound::RoutingTable;
pub use service::RoutingService;
