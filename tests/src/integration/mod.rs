//! Cross-subsystem scenarios over several in-process nodes.

pub mod harness;

mod chain;
mod consensus;
mod gossip;
