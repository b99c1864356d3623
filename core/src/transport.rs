//! Blocking transport backed by a `ureq` agent.

use std::fmt;

use tracing::warn;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::session::Session;

/// Executes requests over the network and carries the cookie session.
///
/// Status codes are never turned into errors here: 4xx/5xx responses come
/// back as data so the client can normalize them. Once a status line has
/// arrived the call is `Ok`, even if the body cannot be read in full.
pub struct UreqTransport {
    agent: Agent,
    session: Session,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            session: Session::new(config),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.session.apply(&mut request);
        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let mut response = match method {
            HttpMethod::Get => with_headers(self.agent.get(&path), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&path), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&path), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&path), &headers), body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                warn!(%path, status, error = %err, "response body could not be read");
                String::new()
            }
        };

        let response = HttpResponse {
            status,
            headers,
            body,
        };
        self.session.record(&path, &response);
        Ok(response)
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
