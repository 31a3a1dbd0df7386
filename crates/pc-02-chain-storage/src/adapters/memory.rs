use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::KVStoreError;
use crate::ports::outbound::KeyValueStore;

/// In-memory key/value store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryKVStore {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KVStoreError> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn len(&self) -> usize {
        self.data.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_len() {
        let store = InMemoryKVStore::new();
        assert!(store.is_empty());

        store.set("k", vec![1, 2]).unwrap();
        store.set("k", vec![3]).unwrap();

        assert_eq!(store.get("k").unwrap(), Some(vec![3]));
        assert_eq!(store.get("missing").unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
