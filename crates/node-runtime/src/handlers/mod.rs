//! # Message Handlers
//!
//! Handlers registered on the gossip service for message kinds owned by other
//! subsystems.

pub mod consensus;

pub use consensus::ConsensusHandler;
