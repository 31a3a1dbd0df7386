//! # Ack Timer Registry
//!
//! One oneshot channel per outstanding packet id. `stop` sends into the
//! channel, the single waiter races it against the deadline with
//! `tokio::time::timeout_at`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::{timeout_at, Instant};

use crate::ports::inbound::{AckOutcome, AckTimers};

type AckData = Option<Vec<u8>>;

struct PendingAck {
    deadline: Instant,
    /// Taken by `stop`.
    tx: Option<oneshot::Sender<AckData>>,
    /// Taken by `wait`.
    rx: Option<oneshot::Receiver<AckData>>,
}

#[derive(Default)]
pub struct AckTimerRegistry {
    pending: Mutex<HashMap<String, PendingAck>>,
}

impl AckTimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers neither stopped nor expired-and-collected.
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .values()
            .filter(|entry| entry.tx.is_some())
            .count()
    }

    pub fn is_pending(&self, packet_id: &str) -> bool {
        self.pending
            .lock()
            .get(packet_id)
            .is_some_and(|entry| entry.tx.is_some())
    }
}

#[async_trait]
impl AckTimers for AckTimerRegistry {
    fn set(&self, packet_id: &str, timeout: Duration) {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(
            packet_id.to_string(),
            PendingAck {
                deadline: Instant::now() + timeout,
                tx: Some(tx),
                rx: Some(rx),
            },
        );
    }

    async fn wait(&self, packet_id: &str) -> AckOutcome {
        let (deadline, rx) = {
            let mut pending = self.pending.lock();
            let Some(entry) = pending.get_mut(packet_id) else {
                return AckOutcome::Expired;
            };
            let Some(rx) = entry.rx.take() else {
                return AckOutcome::Expired;
            };
            let deadline = entry.deadline;
            if entry.tx.is_none() {
                pending.remove(packet_id);
            }
            (deadline, rx)
        };

        let outcome = match timeout_at(deadline, rx).await {
            Ok(Ok(data)) => AckOutcome::Acked(data),
            Ok(Err(_)) | Err(_) => AckOutcome::Expired,
        };
        if outcome == AckOutcome::Expired {
            self.pending.lock().remove(packet_id);
        }
        outcome
    }

    fn stop(&self, packet_id: &str, data: Option<Vec<u8>>) -> bool {
        let mut pending = self.pending.lock();
        let Some(entry) = pending.get_mut(packet_id) else {
            return false;
        };
        if Instant::now() >= entry.deadline {
            pending.remove(packet_id);
            return false;
        }
        let Some(tx) = entry.tx.take() else {
            return false;
        };
        let delivered = tx.send(data).is_ok();
        // Keep the entry only while its receiver has not been collected.
        if !delivered || entry.rx.is_none() {
            pending.remove(packet_id);
        }
        delivered
    }
}
