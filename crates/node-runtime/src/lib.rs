//! # Node Runtime Library
//!
//! Wires the Peerchain subsystems into a running [`Node`]. The binary in
//! `main.rs` runs one node over UDP; tests run many over a
//! [`MemoryNetwork`](adapters::MemoryNetwork).
//!
//! ## Subsystems
//!
//! 1. Routing (pc-01) - next hop per origin
//! 2. Chain Storage (pc-02) - hash-linked block log
//! 3. Gossip (pc-03) - rumor mongering, acks, anti-entropy
//! 4. Consensus (pc-04) - multi-instance Paxos per block index
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: ports define contracts, adapters implement them
//! - **Single channel**: consensus reaches other nodes only through gossip

pub mod adapters;
pub mod container;
pub mod errors;
pub mod handlers;
pub mod node;

pub use container::{ConfigError, NodeConfig, SubsystemContainer};
pub use errors::NodeError;
pub use node::Node;
