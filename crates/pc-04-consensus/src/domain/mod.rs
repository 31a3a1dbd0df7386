//! # Domain Layer for Consensus
//!
//! - **config**: `PaxosConfig`, quorum threshold
//! - **instance**: one Synod instance per logical step
//! - **errors**: `ConsensusError`

mod config;
mod errors;
mod instance;

pub use config::*;
pub use errors::*;
pub use instance::*;
