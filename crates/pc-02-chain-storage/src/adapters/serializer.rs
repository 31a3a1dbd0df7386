use shared_types::Block;

use crate::domain::ChainError;
use crate::ports::outbound::BlockSerializer;

/// Default block serializer using bincode.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeBlockSerializer;

impl BlockSerializer for BincodeBlockSerializer {
    fn serialize(&self, block: &Block) -> Result<Vec<u8>, ChainError> {
        bincode::serialize(block).map_err(|e| ChainError::Serialization(e.to_string()))
    }

    fn deserialize(&self, data: &[u8]) -> Result<Block, ChainError> {
        bincode::deserialize(data).map_err(|e| ChainError::Serialization(e.to_string()))
    }
}
