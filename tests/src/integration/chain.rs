//! # Chain Integration Tests
//!
//! The block store as consensus drives it: genesis linkage, rejected
//! out-of-place blocks, and a node resuming at the stored chain length.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use node_runtime::adapters::MemoryNetwork;
    use node_runtime::{Node, NodeConfig};
    use pc_02_chain_storage::{ChainError, ChainStorageService, ChainStore, InMemoryKVStore};
    use pc_04_consensus::ConsensusEngine;
    use shared_types::{Block, PaxosValue, ZERO_HASH};

    fn store() -> Arc<dyn ChainStore> {
        Arc::new(ChainStorageService::new(InMemoryKVStore::new()))
    }

    #[test]
    fn test_genesis_links_to_zero_hash_and_moves_head() {
        let chain = store();

        let genesis = chain.mint_block(PaxosValue::new("g.txt", "00")).unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.prev_hash, ZERO_HASH);

        chain.add_block(genesis.clone()).unwrap();
        assert_eq!(chain.head_hash().unwrap(), Some(genesis.hash));

        let next = chain.mint_block(PaxosValue::new("n.txt", "01")).unwrap();
        assert_eq!(next.prev_hash, genesis.hash);
        assert_eq!(next.index, 1);
    }

    #[test]
    fn test_second_genesis_rejected() {
        let chain = store();
        let genesis = chain.mint_block(PaxosValue::new("g.txt", "00")).unwrap();
        chain.add_block(genesis).unwrap();

        let rival = Block::new(0, PaxosValue::new("rival.txt", "ff"), ZERO_HASH);
        let err = chain.add_block(rival).unwrap_err();

        assert!(err.is_mismatch());
        assert!(matches!(
            err,
            ChainError::Mismatch {
                expected_index: 1,
                actual_index: 0
            }
        ));
        assert_eq!(chain.length().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_single_node_chain_is_linked_end_to_end() {
        let network = MemoryNetwork::new();
        let node = Node::new(NodeConfig::default(), Arc::new(network.transport("solo"))).unwrap();

        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(node.propose(format!("{}.txt", i), "m").await.unwrap().unique_id);
        }

        let blocks = node.chain().blocks().unwrap();
        assert_eq!(blocks.len(), 5);
        for pair in blocks.windows(2) {
            let (newer, older) = (&pair[0], &pair[1]);
            assert_eq!(newer.prev_hash, older.hash);
            assert_eq!(newer.index, older.index + 1);
            assert!(newer.has_valid_hash());
        }
        assert!(blocks[4].is_genesis());
        for id in &ids {
            assert!(node.chain().contains_value(id).unwrap());
        }
        assert!(!node.chain().contains_value("never-proposed").unwrap());
    }

    #[tokio::test]
    async fn test_node_resumes_at_stored_chain_length() {
        let network = MemoryNetwork::new();
        let chain = store();

        let first = Node::with_chain(
            NodeConfig::default(),
            Arc::new(network.transport("a")),
            Arc::clone(&chain),
        )
        .unwrap();
        first.propose("x", "1").await.unwrap();
        first.propose("y", "2").await.unwrap();
        drop(first);

        let restarted = Node::with_chain(
            NodeConfig::default(),
            Arc::new(network.transport("a")),
            Arc::clone(&chain),
        )
        .unwrap();
        assert_eq!(restarted.container().consensus.current_step(), 2);

        let value = restarted.propose("z", "3").await.unwrap();
        let head = chain.blocks().unwrap().remove(0);
        assert_eq!(head.index, 2);
        assert_eq!(head.value, value);
    }
}
