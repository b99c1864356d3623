//! Error types for the tic-tac-toe API client.
//!
//! # Design
//! HTTP-level failures are not errors at this layer: they are normalized into
//! [`ErrorResult`](crate::result::ErrorResult) values. The types here cover
//! what happens below and above that boundary: a round-trip that produced no
//! response at all, and a success payload that does not match the expected
//! shape.

use thiserror::Error;

/// The transport received no response from the server.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A `SuccessResult` payload could not be decoded into the requested type.
#[derive(Debug, Error)]
#[error("deserialization failed: {0}")]
pub struct DecodeError(#[from] serde_json::Error);
