use std::time::Duration;

/// Gossip timing and mongering parameters.
///
/// A zero interval disables the corresponding periodic task; a zero
/// `ack_timeout` disables acknowledged delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct GossipConfig {
    /// Period of the anti-entropy status push.
    pub anti_entropy_interval: Duration,
    /// Period of the empty heartbeat broadcast.
    pub heartbeat_interval: Duration,
    /// How long a broadcast waits for an ack before resending.
    pub ack_timeout: Duration,
    /// Probability in `0..=1` of pushing our status onwards after an
    /// in-sync exchange.
    pub continue_mongering: f64,
    /// Receive loop poll timeout.
    pub recv_timeout: Duration,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            anti_entropy_interval: Duration::ZERO,
            heartbeat_interval: Duration::ZERO,
            ack_timeout: Duration::from_secs(3),
            continue_mongering: 0.5,
            recv_timeout: Duration::from_secs(1),
        }
    }
}

impl GossipConfig {
    pub fn acks_enabled(&self) -> bool {
        !self.ack_timeout.is_zero()
    }
}
