//! # Domain Layer for Routing
//!
//! Pure, synchronous routing logic. Locking lives in the service layer.

mod errors;
mod routing_table;

pub use errors::*;
pub use routing_table::*;
