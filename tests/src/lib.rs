//! # Peerchain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── peerchain_benchmarks.rs   # criterion: chain, rumor store, codec
//! └── src/integration/
//!     ├── harness.rs                # Cluster over a MemoryNetwork
//!     ├── gossip.rs                 # dissemination, anti-entropy, routing
//!     ├── consensus.rs              # multi-node Paxos and TLC catch-up
//!     └── chain.rs                  # block linkage and restart
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::consensus
//! cargo bench -p pc-tests
//! ```

#![allow(dead_code)]

pub mod integration;
