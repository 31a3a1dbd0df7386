//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the chain store. Durability is entirely the
//! adapter's concern.

use shared_types::Block;

use crate::domain::{ChainError, KVStoreError};

/// Minimal key/value persistence contract.
///
/// Testing: [`InMemoryKVStore`](crate::adapters::InMemoryKVStore).
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KVStoreError>;

    /// Number of stored keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Block encoding used for persistence.
pub trait BlockSerializer: Send + Sync {
    fn serialize(&self, block: &Block) -> Result<Vec<u8>, ChainError>;

    fn deserialize(&self, data: &[u8]) -> Result<Block, ChainError>;
}
