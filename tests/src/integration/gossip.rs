//! # Gossip Integration Tests
//!
//! Several nodes over the in-memory network: dissemination, acknowledged
//! delivery, anti-entropy repair, route learning and private delivery.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pc_01_routing::RoutingTable;
    use pc_03_gossip::{GossipError, MessageHandler, RumorStore};
    use shared_types::{Header, Message, MessageKind};

    use crate::integration::harness::{address, wait_until, Cluster, Topology};

    const SETTLE: Duration = Duration::from_secs(5);

    /// Records every chat message delivered to a node.
    #[derive(Default)]
    struct ChatRecorder {
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ChatRecorder {
        fn messages(&self) -> Vec<(String, String)> {
            self.seen.lock().clone()
        }
    }

    #[async_trait]
    impl MessageHandler for ChatRecorder {
        async fn handle(&self, msg: Message, header: Header) -> Result<(), GossipError> {
            if let Message::Chat(chat) = msg {
                self.seen.lock().push((header.source, chat.message));
            }
            Ok(())
        }
    }

    fn record_chats(cluster: &Cluster, i: usize) -> Arc<ChatRecorder> {
        let recorder = Arc::new(ChatRecorder::default());
        cluster.nodes[i]
            .container()
            .gossip
            .register_handler(MessageKind::Chat, Arc::clone(&recorder) as _);
        recorder
    }

    // =========================================================================
    // DISSEMINATION
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_broadcast_reaches_peer_and_is_acked() {
        let cluster = Cluster::start_with(2, Topology::Mesh, |config| {
            config.gossip.ack_timeout = Duration::from_secs(30);
        })
        .await;
        let (a, b) = (&cluster.nodes[0], &cluster.nodes[1]);

        let payload = Message::chat("P");
        let rumor = a.broadcast(payload.clone()).await.unwrap();
        assert_eq!(rumor.sequence, 1);

        let b_rumors = b.container().rumors.clone();
        assert!(wait_until(SETTLE, || b_rumors.sequence_of("n0") == 1).await);
        let stored = b_rumors.get_from("n0", 0);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].origin, "n0");
        assert_eq!(stored[0].sequence, 1);
        assert_eq!(stored[0].msg, payload);

        let a_acks = a.container().acks.clone();
        assert!(wait_until(SETTLE, || a_acks.pending_count() == 0).await);

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rumor_travels_the_whole_line() {
        let cluster = Cluster::start(5, Topology::Line).await;

        cluster.nodes[0]
            .broadcast(Message::chat("end to end"))
            .await
            .unwrap();

        for node in &cluster.nodes {
            let rumors = node.container().rumors.clone();
            assert!(
                wait_until(SETTLE, || rumors.sequence_of("n0") == 1).await,
                "{} never got the rumor",
                node.local_address()
            );
        }

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_from_one_origin_fully_delivered() {
        let cluster = Cluster::start_with(3, Topology::Line, |config| {
            config.gossip.anti_entropy_interval = Duration::from_millis(100);
        })
        .await;
        let recorder = record_chats(&cluster, 2);

        for i in 0..5 {
            cluster.nodes[0]
                .broadcast(Message::chat(format!("m{}", i)))
                .await
                .unwrap();
        }

        assert!(wait_until(SETTLE, || recorder.messages().len() == 5).await);
        let mut texts: Vec<String> = recorder.messages().into_iter().map(|(_, m)| m).collect();
        texts.sort();
        assert_eq!(texts, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert_eq!(cluster.nodes[2].status_vector().get("n0"), Some(&5));

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_heartbeats_advance_status() {
        let cluster = Cluster::start_with(2, Topology::Mesh, |config| {
            config.gossip.heartbeat_interval = Duration::from_millis(100);
            config.gossip.anti_entropy_interval = Duration::from_millis(100);
        })
        .await;

        let b = &cluster.nodes[1];
        assert!(
            wait_until(SETTLE, || b.status_vector().get("n0").copied().unwrap_or(0) >= 2).await
        );

        cluster.stop().await;
    }

    // =========================================================================
    // ANTI-ENTROPY
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_anti_entropy_repairs_lost_rumor() {
        let cluster = Cluster::build(2, Topology::Mesh, |config| {
            config.gossip.ack_timeout = Duration::ZERO;
            config.gossip.anti_entropy_interval = Duration::from_millis(100);
        });
        for node in &cluster.nodes {
            node.start().await.unwrap();
        }
        cluster.network.cut_link("n0", "n1");

        cluster.nodes[0]
            .broadcast(Message::chat("lost once"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(cluster.nodes[1].status_vector().get("n0").is_none());

        cluster.network.restore_link("n0", "n1");
        let rumors = cluster.nodes[1].container().rumors.clone();
        assert!(wait_until(SETTLE, || rumors.sequence_of("n0") == 1).await);

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_status_converges_across_origins() {
        let cluster = Cluster::start_with(4, Topology::Mesh, |config| {
            config.gossip.anti_entropy_interval = Duration::from_millis(100);
        })
        .await;

        for (i, node) in cluster.nodes.iter().enumerate() {
            for k in 0..=i {
                node.broadcast(Message::chat(format!("{}-{}", i, k)))
                    .await
                    .unwrap();
            }
        }

        for node in &cluster.nodes {
            assert!(
                wait_until(SETTLE, || {
                    let status = node.status_vector();
                    (0..4).all(|i| status.get(&address(i)).copied() == Some(i as u64 + 1))
                })
                .await,
                "{} did not converge: {:?}",
                node.local_address(),
                node.status_vector()
            );
        }

        cluster.stop().await;
    }

    // =========================================================================
    // ROUTING AND POINT-TO-POINT
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_route_learned_from_rumor_and_used_by_unicast() {
        let cluster = Cluster::start(3, Topology::Line).await;
        let recorder = record_chats(&cluster, 2);
        let (n0, n2) = (&cluster.nodes[0], &cluster.nodes[2]);

        n2.broadcast(Message::chat("hello line")).await.unwrap();
        assert!(
            wait_until(SETTLE, || n0.routing_table().get("n2").map(String::as_str) == Some("n1"))
                .await
        );
        assert_eq!(
            n0.container().routing.route("n2").unwrap(),
            "n1".to_string()
        );

        n0.unicast("n2", Message::chat("direct")).await.unwrap();
        assert!(
            wait_until(SETTLE, || recorder
                .messages()
                .contains(&("n0".to_string(), "direct".to_string())))
            .await
        );

        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_unicast_without_route_fails() {
        let cluster = Cluster::start(2, Topology::Mesh).await;
        let err = cluster.nodes[0]
            .unicast("nowhere", Message::chat("x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nowhere"));
        cluster.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_private_message_delivered_to_recipient_only() {
        let cluster = Cluster::start(3, Topology::Mesh).await;
        let at_n1 = record_chats(&cluster, 1);
        let at_n2 = record_chats(&cluster, 2);

        cluster.nodes[0]
            .broadcast(Message::private(["n2".to_string()], Message::chat("secret")))
            .await
            .unwrap();

        assert!(wait_until(SETTLE, || at_n2.messages().len() == 1).await);
        let n1_rumors = cluster.nodes[1].container().rumors.clone();
        assert!(wait_until(SETTLE, || n1_rumors.sequence_of("n0") == 1).await);
        assert!(at_n1.messages().is_empty());
        assert_eq!(at_n2.messages()[0], ("n0".to_string(), "secret".to_string()));

        cluster.stop().await;
    }
}
