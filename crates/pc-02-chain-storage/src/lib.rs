//! # Chain Storage Subsystem (pc-02)
//!
//! Hash-linked, append-only sequence of blocks. Each block commits exactly one
//! value agreed on by consensus.
//!
//! ## Storage Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `LAST_BLOCK` | raw 32-byte hash of the head block |
//! | hex-encoded block hash | bincode-encoded [`Block`](shared_types::Block) |
//!
//! ## Invariants
//!
//! - A block is appended only if `block.index == length` and
//!   `block.prev_hash == head_hash` (genesis: 32 zero bytes).
//! - Appends are serialized; the head pointer is written after the block.
//! - [`ChainStore::contains_value`] is a linear walk from head to genesis.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{BincodeBlockSerializer, InMemoryKVStore};
pub use domain::{ChainError, KVStoreError, LAST_BLOCK_KEY};
pub use ports::inbound::ChainStore;
pub use ports::outbound::{BlockSerializer, KeyValueStore};
pub use service::ChainStorageService;
