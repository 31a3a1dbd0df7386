//! # Ports Layer
//!
//! - **Inbound:** [`inbound::ConsensusEngine`]
//! - **Outbound:** the chain store from `pc-02-chain-storage`, injected as
//!   `Arc<dyn ChainStore>`.

pub mod inbound;

pub use pc_02_chain_storage::ChainStore;
