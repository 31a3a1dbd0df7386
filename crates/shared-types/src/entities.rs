//! # Core Domain Entities
//!
//! Defines the entities shared by the gossip, consensus and chain subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: [`Address`]
//! - **Consensus**: [`PaxosValue`]
//! - **Chain**: [`Block`], [`Hash`]

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Opaque network endpoint of a peer (e.g. `127.0.0.1:4000`).
///
/// Used both as the node identity and as the routing key.
pub type Address = String;

// =============================================================================
// CLUSTER B: CONSENSUS
// =============================================================================

/// The application payload agreed on by one Paxos instance.
///
/// `unique_id` distinguishes two proposals carrying the same name and
/// metahash; accepts are tallied per `unique_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaxosValue {
    pub unique_id: String,
    pub filename: String,
    pub metahash: String,
}

impl PaxosValue {
    /// Create a value with a fresh random unique id.
    pub fn new(filename: impl Into<String>, metahash: impl Into<String>) -> Self {
        Self {
            unique_id: Uuid::new_v4().to_string(),
            filename: filename.into(),
            metahash: metahash.into(),
        }
    }

    /// Create a value with a caller-chosen unique id.
    pub fn with_id(
        unique_id: impl Into<String>,
        filename: impl Into<String>,
        metahash: impl Into<String>,
    ) -> Self {
        Self {
            unique_id: unique_id.into(),
            filename: filename.into(),
            metahash: metahash.into(),
        }
    }
}

// =============================================================================
// CLUSTER C: CHAIN
// =============================================================================

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// Previous-hash sentinel of the genesis block.
pub const ZERO_HASH: Hash = [0u8; 32];

/// One link of the hash chain, committing exactly one agreed value.
///
/// Blocks are immutable once appended; see [`Block::compute_hash`] for the
/// hashing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 = first block).
    pub index: u64,
    /// Value agreed on for the step with the same number.
    pub value: PaxosValue,
    /// Hash of the previous block, [`ZERO_HASH`] for the first block.
    pub prev_hash: Hash,
    /// `SHA256(index || unique_id || filename || metahash || prev_hash)`.
    pub hash: Hash,
}

impl Block {
    /// Build a block and compute its hash.
    pub fn new(index: u64, value: PaxosValue, prev_hash: Hash) -> Self {
        let hash = Self::compute_hash(index, &value, &prev_hash);
        Self {
            index,
            value,
            prev_hash,
            hash,
        }
    }

    /// Compute the block hash.
    ///
    /// The index is written as its decimal ASCII representation, followed by
    /// the three value strings and the raw previous hash bytes.
    pub fn compute_hash(index: u64, value: &PaxosValue, prev_hash: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(index.to_string().as_bytes());
        hasher.update(value.unique_id.as_bytes());
        hasher.update(value.filename.as_bytes());
        hasher.update(value.metahash.as_bytes());
        hasher.update(prev_hash);
        hasher.finalize().into()
    }

    /// Whether the stored hash matches the block contents.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == Self::compute_hash(self.index, &self.value, &self.prev_hash)
    }

    /// Hex encoding of the block hash (the block's storage key).
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Whether this is the first block of a chain.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.prev_hash == ZERO_HASH
    }
}
