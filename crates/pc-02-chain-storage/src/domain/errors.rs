use thiserror::Error;

/// Errors surfaced by the key/value persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Chain store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The block does not sit at the current chain length.
    #[error("Block index mismatch: expected {expected_index}, got {actual_index}")]
    Mismatch {
        expected_index: u64,
        actual_index: u64,
    },

    /// The block does not link to the current head.
    #[error("Previous hash mismatch: expected {expected}, got {actual}")]
    PrevHashMismatch { expected: String, actual: String },

    /// The stored hash does not match the block contents.
    #[error("Block hash does not match its contents: {0}")]
    InvalidHash(String),

    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),

    #[error("Block serialization error: {0}")]
    Serialization(String),
}

impl ChainError {
    /// Whether the block was rejected because another block already holds
    /// its position (a concurrent or duplicate finalization).
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            ChainError::Mismatch { .. } | ChainError::PrevHashMismatch { .. }
        )
    }
}
