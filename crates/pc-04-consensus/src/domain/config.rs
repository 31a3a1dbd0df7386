use std::time::Duration;

/// Quorum size for a given number of peers.
pub type ThresholdFn = fn(u64) -> usize;

/// Strict majority: `n / 2 + 1`.
pub fn majority(total_peers: u64) -> usize {
    (total_peers / 2 + 1) as usize
}

#[derive(Debug, Clone)]
pub struct PaxosConfig {
    /// Number of nodes taking part in consensus.
    pub total_peers: u64,
    /// This node's proposer id, in `1..=total_peers`.
    pub paxos_id: u64,
    pub threshold: ThresholdFn,
    /// How long a proposer waits for a phase to complete before retrying
    /// with a higher id.
    pub proposer_retry: Duration,
}

impl Default for PaxosConfig {
    fn default() -> Self {
        Self {
            total_peers: 1,
            paxos_id: 1,
            threshold: majority,
            proposer_retry: Duration::from_secs(2),
        }
    }
}

impl PaxosConfig {
    pub fn quorum(&self) -> usize {
        (self.threshold)(self.total_peers)
    }
}
