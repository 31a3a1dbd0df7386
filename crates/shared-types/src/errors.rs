//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// A message or packet could not be encoded or decoded.
///
/// Fatal for the single message it concerns, never for the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}

impl SerializationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SerializationError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}
