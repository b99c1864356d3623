//! Client configuration.
//!
//! # Design
//! The transport settings are built once and handed to the transport by
//! value. Nothing mutates them afterwards; there are no global defaults.

/// Environment variable holding the server origin.
pub const API_URL_VAR: &str = "TICTACTOE_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// How the transport authenticates requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Cookie the server stores the CSRF token in.
    pub csrf_cookie_name: String,
    /// Header the token is echoed back in.
    pub csrf_header_name: String,
    /// Send stored cookies (and the CSRF header) with every request.
    pub with_credentials: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            with_credentials: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: TransportConfig::default(),
        }
    }

    /// Read the server origin from `TICTACTOE_API_URL`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
