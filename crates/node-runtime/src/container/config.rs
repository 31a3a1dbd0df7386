//! # Node Configuration
//!
//! Unified configuration for the gossip engine, the consensus engine and the
//! node's network identity.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PC_LISTEN_ADDR` | `listen_address` |
//! | `PC_PEERS` | `peers` (comma separated) |
//! | `PC_TOTAL_PEERS` | `paxos.total_peers` |
//! | `PC_PAXOS_ID` | `paxos.paxos_id` |
//! | `PC_PROPOSER_RETRY_MS` | `paxos.proposer_retry` |
//! | `PC_ACK_TIMEOUT_MS` | `gossip.ack_timeout` |
//! | `PC_ANTI_ENTROPY_MS` | `gossip.anti_entropy_interval` |
//! | `PC_HEARTBEAT_MS` | `gossip.heartbeat_interval` |
//! | `PC_CONTINUE_MONGERING` | `gossip.continue_mongering` |

use std::str::FromStr;
use std::time::Duration;

use pc_03_gossip::GossipConfig;
use pc_04_consensus::PaxosConfig;
use shared_types::Address;
use thiserror::Error;
use tracing::warn;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Gossip timing and mongering.
    pub gossip: GossipConfig,
    /// Paxos membership and retry policy.
    pub paxos: PaxosConfig,
    /// Address the UDP transport binds to.
    pub listen_address: Address,
    /// Direct neighbors added at startup.
    pub peers: Vec<Address>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            gossip: GossipConfig::default(),
            paxos: PaxosConfig::default(),
            listen_address: "127.0.0.1:2000".to_string(),
            peers: Vec::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Paxos id {paxos_id} outside 1..={total_peers}")]
    InvalidPaxosId { paxos_id: u64, total_peers: u64 },

    #[error("Continue-mongering probability {0} outside 0..=1")]
    InvalidMongering(f64),
}

impl NodeConfig {
    /// Defaults with `PC_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("PC_LISTEN_ADDR") {
            config.listen_address = addr;
        }
        if let Some(peers) = lookup("PC_PEERS") {
            config.peers = peers
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }

        override_parsed(&lookup, "PC_TOTAL_PEERS", &mut config.paxos.total_peers);
        override_parsed(&lookup, "PC_PAXOS_ID", &mut config.paxos.paxos_id);
        override_millis(&lookup, "PC_PROPOSER_RETRY_MS", &mut config.paxos.proposer_retry);
        override_millis(&lookup, "PC_ACK_TIMEOUT_MS", &mut config.gossip.ack_timeout);
        override_millis(
            &lookup,
            "PC_ANTI_ENTROPY_MS",
            &mut config.gossip.anti_entropy_interval,
        );
        override_millis(&lookup, "PC_HEARTBEAT_MS", &mut config.gossip.heartbeat_interval);
        override_parsed(
            &lookup,
            "PC_CONTINUE_MONGERING",
            &mut config.gossip.continue_mongering,
        );

        config
    }

    /// Reject settings the engines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paxos = &self.paxos;
        if paxos.paxos_id == 0 || paxos.paxos_id > paxos.total_peers {
            return Err(ConfigError::InvalidPaxosId {
                paxos_id: paxos.paxos_id,
                total_peers: paxos.total_peers,
            });
        }
        let p = self.gossip.continue_mongering;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidMongering(p));
        }
        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, field: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *field = value,
        Err(_) => warn!(%key, value = %raw, "ignoring unparsable override"),
    }
}

fn override_millis<F>(lookup: &F, key: &str, field: &mut Duration)
where
    F: Fn(&str) -> Option<String>,
{
    let mut millis = field.as_millis() as u64;
    override_parsed(lookup, key, &mut millis);
    *field = Duration::from_millis(millis);
}
