use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pc_03_gossip::{GossipApi, GossipService, Transport, TransportError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Take packets off `transport` until shutdown, handling each on its own
/// task. The shutdown signal wins over a ready packet.
pub(super) async fn receive_loop(
    gossip: Arc<GossipService>,
    transport: Arc<dyn Transport>,
    recv_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let local = gossip.local_address().clone();
    loop {
        let received = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            received = transport.recv(recv_timeout) => received,
        };

        match received {
            Ok(packet) => {
                let gossip = Arc::clone(&gossip);
                tokio::spawn(async move {
                    let packet_id = packet.header.packet_id.clone();
                    let kind = packet.msg.kind();
                    if let Err(err) = gossip.handle_packet(packet).await {
                        warn!(peer = %gossip.local_address(), %packet_id, %kind, error = %err, "packet not handled");
                    }
                });
            }
            Err(TransportError::Timeout) => {}
            Err(TransportError::Closed) => {
                warn!(peer = %local, "transport closed");
                break;
            }
            Err(err) => warn!(peer = %local, error = %err, "receive failed"),
        }
    }
    debug!(peer = %local, "receive loop stopped");
}

/// Run `tick` every `period` (first run one period from now) until shutdown.
pub(super) fn spawn_ticker<F, Fut>(
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut tick: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = interval.tick() => tick().await,
            }
        }
    })
}
