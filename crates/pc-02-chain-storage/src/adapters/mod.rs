//! Adapters for the outbound ports.

mod memory;
mod serializer;

pub use memory::InMemoryKVStore;
pub use serializer::BincodeBlockSerializer;
