//! # Subsystem Container
//!
//! Configuration and dependency injection for one node.
//!
//! - Subsystems are initialized in dependency order (Level 0 → Level 3)
//! - Gossip is the only channel between nodes; consensus reaches the network
//!   through the handler registered on gossip

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig};
pub use subsystems::SubsystemContainer;
