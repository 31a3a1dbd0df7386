//! Append checks, independent of any storage.

use shared_types::{Block, Hash};

use super::ChainError;

/// Check that `block` extends a chain of `length` blocks whose head is `head`.
pub fn validate_extension(block: &Block, length: u64, head: &Hash) -> Result<(), ChainError> {
    if block.index != length {
        return Err(ChainError::Mismatch {
            expected_index: length,
            actual_index: block.index,
        });
    }
    if &block.prev_hash != head {
        return Err(ChainError::PrevHashMismatch {
            expected: hex::encode(head),
            actual: hex::encode(block.prev_hash),
        });
    }
    if !block.has_valid_hash() {
        return Err(ChainError::InvalidHash(block.hash_hex()));
    }
    Ok(())
}
