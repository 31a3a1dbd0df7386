//! # Ports Layer
//!
//! Routing has no outbound dependencies; it only exposes [`inbound::RoutingTable`].

pub mod inbound;
