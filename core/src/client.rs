//! HTTP request builder and outcome normalizer.
//!
//! # Design
//! `HttpClient` holds the server origin and a [`Transport`]. Each verb is
//! split into a `build_*` method that produces an `HttpRequest` and a call
//! method that executes it and normalizes the outcome with
//! [`normalize`](crate::result::normalize). The builders carry no state, so
//! they can be tested without a transport round-trip.

use serde::Serialize;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::filters::Filters;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::result::{normalize, ApiResult, ErrorResult};

#[derive(Debug, Clone)]
pub struct HttpClient<T> {
    base_url: String,
    transport: T,
}

impl<T> HttpClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub fn build_get(&self, endpoint: &Endpoint, filters: &Filters) -> HttpRequest {
        let mut path = self.url(endpoint);
        let query = filters.to_query_string();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<HttpRequest, serde_json::Error> {
        self.build_with_body(HttpMethod::Post, endpoint, body)
    }

    pub fn build_put<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<HttpRequest, serde_json::Error> {
        self.build_with_body(HttpMethod::Put, endpoint, body)
    }

    pub fn build_delete(&self, endpoint: &Endpoint) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(endpoint),
            headers: Vec::new(),
            body: None,
        }
    }

    fn build_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<HttpRequest, serde_json::Error> {
        let body = serde_json::to_string(body)?;
        Ok(HttpRequest {
            method,
            path: self.url(endpoint),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn get(&self, endpoint: &Endpoint, filters: &Filters) -> ApiResult {
        self.send(self.build_get(endpoint, filters))
    }

    pub fn post<B: Serialize + ?Sized>(&self, endpoint: &Endpoint, body: &B) -> ApiResult {
        let request = self
            .build_post(endpoint, body)
            .map_err(|e| ErrorResult::serialization(&e))?;
        self.send(request)
    }

    pub fn put<B: Serialize + ?Sized>(&self, endpoint: &Endpoint, body: &B) -> ApiResult {
        let request = self
            .build_put(endpoint, body)
            .map_err(|e| ErrorResult::serialization(&e))?;
        self.send(request)
    }

    pub fn delete(&self, endpoint: &Endpoint) -> ApiResult {
        self.send(self.build_delete(endpoint))
    }

    fn send(&self, request: HttpRequest) -> ApiResult {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        normalize(self.transport.execute(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::FakeTransport;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn client() -> HttpClient<FakeTransport> {
        HttpClient::new("http://localhost:8000", FakeTransport::default())
    }

    #[test]
    fn build_get_without_filters_has_no_query() {
        let req = client().build_get(&Endpoint::Games, &Filters::new());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/api/v1/games");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_prunes_blank_filters() {
        let filters = Filters::new().with("name", "").with("state", "turn_o");
        let req = client().build_get(&Endpoint::Games, &filters);
        assert_eq!(req.path, "http://localhost:8000/api/v1/games?state=turn_o");
    }

    #[test]
    fn build_post_sends_full_body() {
        let body = json!({"name": "", "extra": null});
        let req = client().build_post(&Endpoint::Games, &body).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn build_put_targets_single_game() {
        let req = client().build_put(&Endpoint::game("g1"), &json!({"player": "x"})).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/api/v1/games/g1");
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build_delete(&Endpoint::game(3));
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = HttpClient::new("http://localhost:8000/", FakeTransport::default());
        let req = client.build_get(&Endpoint::Who, &Filters::new());
        assert_eq!(req.path, "http://localhost:8000/api/v1/who");
    }

    #[test]
    fn get_normalizes_success() {
        let client = client();
        client.transport().respond(200, r#"{"data":[],"status":"ok","message":"Here are the games!"}"#);
        let result = client.get(&Endpoint::Games, &Filters::new()).unwrap();
        assert_eq!(result.status, 200);
        assert_eq!(result.data["message"], "Here are the games!");
    }

    #[test]
    fn delete_normalizes_failure() {
        let client = client();
        client.transport().respond(405, r#"{"detail":"Method \"DELETE\" not allowed."}"#);
        let err = client.delete(&Endpoint::game(1)).unwrap_err();
        assert_eq!(err.status, Some(405));
        assert_eq!(err.message.as_deref(), Some("Method Not Allowed"));
    }

    #[test]
    fn network_failure_is_normalized() {
        let client = client();
        client.transport().fail("connection refused");
        let err = client.post(&Endpoint::Logout, &json!({})).unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn unserializable_body_never_reaches_transport() {
        let client = client();
        let mut body = BTreeMap::new();
        body.insert(vec![1u8], "non-string key");
        let err = client.post(&Endpoint::Games, &body).unwrap_err();
        assert_eq!(err.status, None);
        assert!(err.message.unwrap().starts_with("serialization failed"));
        assert!(client.transport().requests().is_empty());
    }
}
