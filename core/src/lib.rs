//! Client for the Tic-To-Tac-To-Toe game API.
//!
//! # Overview
//! [`GameApi`] exposes one method per server operation. It delegates to
//! [`HttpClient`], which builds plain-data requests, runs them through a
//! [`Transport`] and normalizes every outcome into an [`ApiResult`]: a
//! [`SuccessResult`] for 2xx responses, an [`ErrorResult`] for everything
//! else. The [`router`] module holds the client-side route table.
//!
//! # Design
//! - Request building is separate from I/O, so the builders and the
//!   normalization are testable without a network.
//! - [`UreqTransport`] is the stock transport. It owns the immutable
//!   [`TransportConfig`] and the cookie [`Session`] that carries
//!   authentication and the CSRF token.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod filters;
pub mod http;
pub mod result;
pub mod router;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_util;

pub use api::GameApi;
pub use client::HttpClient;
pub use config::{ClientConfig, TransportConfig};
pub use endpoint::Endpoint;
pub use error::{DecodeError, TransportError};
pub use filters::{FilterValue, Filters};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use result::{ApiResult, ErrorResult, SuccessResult};
pub use session::Session;
pub use transport::UreqTransport;
pub use types::{
    Board, Credentials, Envelope, Game, GameState, JoinGame, Move, NewGame, NewMove, Player,
    Registration, User,
};
