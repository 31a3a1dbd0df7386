//! # Chain Storage Service
//!
//! Implements [`ChainStore`] on top of any [`KeyValueStore`].
//!
//! Appends hold `append_lock` for the whole check-then-write sequence, so two
//! racing appends for the same index cannot both pass validation. Reads do not
//! take the lock.

use parking_lot::Mutex;
use shared_types::{Block, Hash, PaxosValue, ZERO_HASH};
use tracing::{debug, info};

use crate::adapters::BincodeBlockSerializer;
use crate::domain::{validate_extension, ChainError, KVStoreError, LAST_BLOCK_KEY};
use crate::ports::inbound::ChainStore;
use crate::ports::outbound::{BlockSerializer, KeyValueStore};

pub struct ChainStorageService<KV, S = BincodeBlockSerializer> {
    kv_store: KV,
    serializer: S,
    append_lock: Mutex<()>,
}

impl<KV: KeyValueStore> ChainStorageService<KV> {
    pub fn new(kv_store: KV) -> Self {
        Self::with_serializer(kv_store, BincodeBlockSerializer)
    }
}

impl<KV: KeyValueStore, S: BlockSerializer> ChainStorageService<KV, S> {
    pub fn with_serializer(kv_store: KV, serializer: S) -> Self {
        Self {
            kv_store,
            serializer,
            append_lock: Mutex::new(()),
        }
    }

    fn read_head(&self) -> Result<Option<Hash>, ChainError> {
        match self.kv_store.get(LAST_BLOCK_KEY)? {
            None => Ok(None),
            Some(bytes) => {
                let hash: Hash = bytes.as_slice().try_into().map_err(|_| {
                    KVStoreError::CorruptionError {
                        message: format!("head pointer has {} bytes", bytes.len()),
                    }
                })?;
                Ok(Some(hash))
            }
        }
    }

    fn read_length(&self, head: &Option<Hash>) -> u64 {
        let keys = self.kv_store.len() as u64;
        if head.is_some() {
            keys.saturating_sub(1)
        } else {
            keys
        }
    }

    fn load(&self, hash: &Hash) -> Result<Block, ChainError> {
        let key = hex::encode(hash);
        let bytes = self
            .kv_store
            .get(&key)?
            .ok_or_else(|| KVStoreError::CorruptionError {
                message: format!("missing block {}", key),
            })?;
        self.serializer.deserialize(&bytes)
    }

    /// Walk from head to genesis, stopping early when `visit` returns true.
    fn walk<F>(&self, mut visit: F) -> Result<(), ChainError>
    where
        F: FnMut(&Block) -> bool,
    {
        let mut cursor = self.read_head()?;
        while let Some(hash) = cursor {
            if hash == ZERO_HASH {
                break;
            }
            let block = self.load(&hash)?;
            if visit(&block) {
                break;
            }
            cursor = Some(block.prev_hash);
        }
        Ok(())
    }
}

impl<KV: KeyValueStore, S: BlockSerializer> ChainStore for ChainStorageService<KV, S> {
    fn mint_block(&self, value: PaxosValue) -> Result<Block, ChainError> {
        let head = self.read_head()?;
        let index = self.read_length(&head);
        Ok(Block::new(index, value, head.unwrap_or(ZERO_HASH)))
    }

    fn add_block(&self, block: Block) -> Result<(), ChainError> {
        let _guard = self.append_lock.lock();

        let head = self.read_head()?;
        let length = self.read_length(&head);
        validate_extension(&block, length, &head.unwrap_or(ZERO_HASH))?;

        let bytes = self.serializer.serialize(&block)?;
        self.kv_store.set(&block.hash_hex(), bytes)?;
        self.kv_store.set(LAST_BLOCK_KEY, block.hash.to_vec())?;

        info!(
            index = block.index,
            hash = %block.hash_hex(),
            filename = %block.value.filename,
            "block appended"
        );
        Ok(())
    }

    fn contains_value(&self, unique_id: &str) -> Result<bool, ChainError> {
        let mut found = false;
        let mut visited = 0u64;
        self.walk(|block| {
            visited += 1;
            found = block.value.unique_id == unique_id;
            found
        })?;
        debug!(unique_id, visited, found, "chain membership scan");
        Ok(found)
    }

    fn head_hash(&self) -> Result<Option<Hash>, ChainError> {
        self.read_head()
    }

    fn length(&self) -> Result<u64, ChainError> {
        let head = self.read_head()?;
        Ok(self.read_length(&head))
    }

    fn get_block(&self, hash_hex: &str) -> Result<Option<Block>, ChainError> {
        match self.kv_store.get(hash_hex)? {
            None => Ok(None),
            Some(bytes) => self.serializer.deserialize(&bytes).map(Some),
        }
    }

    fn blocks(&self) -> Result<Vec<Block>, ChainError> {
        let mut blocks = Vec::new();
        self.walk(|block| {
            blocks.push(block.clone());
            false
        })?;
        Ok(blocks)
    }
}
