//! Normalized call outcomes.
//!
//! # Design
//! Every client call ends in exactly one of two shapes. A 2xx response becomes
//! a [`SuccessResult`]; anything else, including a round-trip that never got a
//! response, becomes an [`ErrorResult`]. Callers pick between them with a
//! plain `match` on [`ApiResult`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{DecodeError, TransportError};
use crate::http::HttpResponse;

/// Message attached to failures that never produced a response.
pub const NETWORK_ERROR: &str = "Network Error";

/// Outcome of a single client call.
pub type ApiResult = Result<SuccessResult, ErrorResult>;

/// A 2xx response: payload and status, taken verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResult {
    pub data: Value,
    pub status: u16,
}

impl SuccessResult {
    /// Decode the payload into a typed value, usually an
    /// [`Envelope`](crate::types::Envelope).
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        Ok(T::deserialize(&self.data)?)
    }
}

/// A failed call.
///
/// `status` is `None` when no response was received, or when the request
/// body could not be serialized.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", describe(.status, .message))]
pub struct ErrorResult {
    pub data: Value,
    pub message: Option<String>,
    pub status: Option<u16>,
}

fn describe(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message) {
        (Some(status), Some(message)) => format!("HTTP {status}: {message}"),
        (Some(status), None) => format!("HTTP {status}"),
        (None, Some(message)) => message.clone(),
        (None, None) => "request failed".to_string(),
    }
}

impl ErrorResult {
    /// Build the error shape for a non-2xx response body.
    pub fn from_response(status: u16, data: Value) -> Self {
        let message = match data.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Null) => None,
            Some(other) => Some(other.to_string()),
            None => status_text(status).map(str::to_string),
        };
        Self {
            data,
            message,
            status: Some(status),
        }
    }

    pub fn network(err: &TransportError) -> Self {
        warn!(error = %err, "no response from server");
        Self {
            data: Value::Null,
            message: Some(NETWORK_ERROR.to_string()),
            status: None,
        }
    }

    pub fn serialization(err: &serde_json::Error) -> Self {
        Self {
            data: Value::Null,
            message: Some(format!("serialization failed: {err}")),
            status: None,
        }
    }

    /// True when the server never answered.
    pub fn is_network(&self) -> bool {
        self.status.is_none() && self.message.as_deref() == Some(NETWORK_ERROR)
    }
}

/// Fixed reason phrases used when the error body carries no `message`.
pub fn status_text(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Bad Request"),
        401 => Some("Unauthorized"),
        402 => Some("Payment Required"),
        403 => Some("Forbidden"),
        404 => Some("Not Found"),
        405 => Some("Method Not Allowed"),
        _ => None,
    }
}

/// Parse a response body as JSON, falling back to the raw text.
pub fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Turn a transport outcome into the normalized result.
pub fn normalize(outcome: Result<HttpResponse, TransportError>) -> ApiResult {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => return Err(ErrorResult::network(&err)),
    };
    debug!(status = response.status, "response received");
    let data = parse_body(&response.body);
    if (200..300).contains(&response.status) {
        Ok(SuccessResult {
            data,
            status: response.status,
        })
    } else {
        Err(ErrorResult::from_response(response.status, data))
    }
}
