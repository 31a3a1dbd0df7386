//! # Consensus Integration Tests
//!
//! Multi-node Paxos over gossip: one proposer, competing proposers, a crashed
//! minority and a partitioned node catching up through TLC.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::join_all;
    use node_runtime::Node;
    use pc_02_chain_storage::ChainStore;
    use pc_04_consensus::ConsensusEngine;
    use shared_types::Block;

    use crate::integration::harness::{wait_until, Cluster, Topology};

    const DECIDE: Duration = Duration::from_secs(30);

    fn blocks(node: &Node) -> Vec<Block> {
        node.chain().blocks().unwrap()
    }

    /// Wait until every node holds `length` blocks, then check they hold the
    /// same ones.
    async fn assert_chains_agree(nodes: &[Node], length: u64) {
        for node in nodes {
            let chain = node.chain();
            assert!(
                wait_until(DECIDE, || chain.length().unwrap() == length).await,
                "{} stuck at {} blocks",
                node.local_address(),
                chain.length().unwrap()
            );
        }
        let reference = blocks(&nodes[0]);
        for node in &nodes[1..] {
            assert_eq!(blocks(node), reference, "{} diverged", node.local_address());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_proposer_decides_on_every_node() {
        let cluster = Cluster::start(3, Topology::Mesh).await;

        let value = tokio::time::timeout(DECIDE, cluster.nodes[0].propose("a.txt", "aa"))
            .await
            .expect("proposal settles")
            .unwrap();
        assert_eq!(value.filename, "a.txt");
        assert_eq!(value.metahash, "aa");

        assert_chains_agree(&cluster.nodes, 1).await;
        for node in &cluster.nodes {
            assert!(node.chain().contains_value(&value.unique_id).unwrap());
            assert_eq!(node.container().consensus.current_step(), 1);
        }

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_proposals_from_different_nodes_extend_one_chain() {
        let cluster = Cluster::start(3, Topology::Mesh).await;

        let mut decided = Vec::new();
        for (i, node) in cluster.nodes.iter().enumerate() {
            let value = tokio::time::timeout(DECIDE, node.propose(format!("f{}", i), "m"))
                .await
                .expect("proposal settles")
                .unwrap();
            decided.push(value);
            assert_chains_agree(&cluster.nodes, i as u64 + 1).await;
        }

        // Each node won its own step, so the chain holds the values in order.
        let chain = blocks(&cluster.nodes[1]);
        let from_genesis: Vec<_> = chain.iter().rev().map(|b| b.value.clone()).collect();
        assert_eq!(from_genesis, decided);
        for (i, value) in decided.iter().enumerate() {
            assert_eq!(value.filename, format!("f{}", i));
        }

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_competing_proposers_never_split_a_step() {
        let cluster = Cluster::start(3, Topology::Mesh).await;

        let proposals = cluster
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| node.propose(format!("race{}", i), "m"));
        let results = tokio::time::timeout(DECIDE, join_all(proposals))
            .await
            .expect("every proposal settles");
        let values: Vec<_> = results.into_iter().map(Result::unwrap).collect();

        let length = cluster
            .nodes
            .iter()
            .map(|node| node.chain().length().unwrap())
            .max()
            .unwrap();
        assert!(length >= 1);
        assert_chains_agree(&cluster.nodes, length).await;

        // Every returned value is the one decided for some block.
        let chain = blocks(&cluster.nodes[0]);
        for value in &values {
            assert!(chain.iter().any(|b| b.value == *value), "{:?} not on chain", value);
        }

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_majority_decides_with_one_node_down() {
        let cluster = Cluster::start(3, Topology::Mesh).await;
        cluster.nodes[2].stop().await.unwrap();
        cluster.network.disconnect("n2");

        let value = tokio::time::timeout(DECIDE, cluster.nodes[0].propose("quorum.txt", "q"))
            .await
            .expect("proposal settles")
            .unwrap();
        assert_eq!(value.filename, "quorum.txt");

        assert_chains_agree(&cluster.nodes[..2], 1).await;
        assert_eq!(cluster.nodes[2].chain().length().unwrap(), 0);

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_partitioned_node_catches_up() {
        let cluster = Cluster::start_with(3, Topology::Mesh, |config| {
            config.gossip.anti_entropy_interval = Duration::from_millis(100);
        })
        .await;
        for other in ["n0", "n1"] {
            cluster.network.cut_link(other, "n2");
            cluster.network.cut_link("n2", other);
        }

        for name in ["one", "two"] {
            tokio::time::timeout(DECIDE, cluster.nodes[0].propose(name, "m"))
                .await
                .expect("proposal settles")
                .unwrap();
        }
        assert_chains_agree(&cluster.nodes[..2], 2).await;
        assert_eq!(cluster.nodes[2].chain().length().unwrap(), 0);

        for other in ["n0", "n1"] {
            cluster.network.restore_link(other, "n2");
            cluster.network.restore_link("n2", other);
        }
        assert_chains_agree(&cluster.nodes, 2).await;
        assert_eq!(cluster.nodes[2].container().consensus.current_step(), 2);

        cluster.stop().await;
    }
}
