//! # Domain Layer for Gossip
//!
//! Pure logic with no I/O:
//!
//! - **config**: `GossipConfig`
//! - **rumor_log**: gapless per-origin rumor log
//! - **status**: anti-entropy comparison of two status vectors
//! - **errors**: `GossipError`, `OutOfOrderRumor`

mod config;
mod errors;
mod rumor_log;
mod status;

pub use config::*;
pub use errors::*;
pub use rumor_log::*;
pub use status::*;
