//! # Domain Layer for Chain Storage
//!
//! - **errors**: `ChainError`, `KVStoreError`
//! - **validation**: pure append checks

mod errors;
mod validation;

pub use errors::*;
pub use validation::*;

/// Reserved key holding the hash of the most recently appended block.
pub const LAST_BLOCK_KEY: &str = "LAST_BLOCK";
