//! Inbound ports (API) for the Chain Storage subsystem.

use shared_types::{Block, Hash, PaxosValue};

use crate::domain::ChainError;

/// Hash-linked block log.
pub trait ChainStore: Send + Sync {
    /// Build, without saving, the block that would extend the current head
    /// with `value`.
    fn mint_block(&self, value: PaxosValue) -> Result<Block, ChainError>;

    /// Append `block` if it sits at the current length and links to the
    /// current head. On success the head pointer resolves to `block.hash`.
    fn add_block(&self, block: Block) -> Result<(), ChainError>;

    /// Whether some block on the path from head to genesis carries a value
    /// with `unique_id`.
    ///
    /// Linear in the chain length: each block is read back from storage.
    fn contains_value(&self, unique_id: &str) -> Result<bool, ChainError>;

    /// Hash of the head block, `None` for an empty chain.
    fn head_hash(&self) -> Result<Option<Hash>, ChainError>;

    /// Number of appended blocks.
    fn length(&self) -> Result<u64, ChainError>;

    /// Look a block up by its hex-encoded hash.
    fn get_block(&self, hash_hex: &str) -> Result<Option<Block>, ChainError>;

    /// Every block, from head back to genesis.
    fn blocks(&self) -> Result<Vec<Block>, ChainError>;
}
