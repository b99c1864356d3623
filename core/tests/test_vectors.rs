//! Verify requests and result normalization against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Each vector describes either an operation and the request it must issue,
//! or a simulated transport outcome and the normalized result. Comparing
//! parsed JSON (not raw strings) avoids false negatives from field ordering.

use std::sync::Mutex;

use serde_json::Value;
use tictactoe_client::{
    ApiResult, GameApi, HttpClient, HttpMethod, HttpRequest, HttpResponse, Player, Transport,
    TransportError,
};

const BASE_URL: &str = "http://localhost:8000";

/// Replays one scripted outcome and keeps the request it was given.
#[derive(Default)]
struct ScriptedTransport {
    outcome: Mutex<Option<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Option<HttpRequest>>,
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.seen.lock().unwrap() = Some(request);
        self.outcome.lock().unwrap().take().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "{}".to_string(),
            })
        })
    }
}

fn api() -> GameApi<ScriptedTransport> {
    GameApi::new(HttpClient::new(BASE_URL, ScriptedTransport::default()))
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_player(s: &str) -> Player {
    match s {
        "x" => Player::X,
        "o" => Player::O,
        other => panic!("unknown player: {other}"),
    }
}

fn run_operation(api: &GameApi<ScriptedTransport>, operation: &str, args: &[Value]) -> ApiResult {
    let s = |i: usize| args[i].as_str().unwrap();
    let n = |i: usize| args[i].as_i64().unwrap();
    match operation {
        "create_game" => api.create_game(s(0)),
        "list_games" => api.list_games(),
        "update_game" => api.update_game(s(0), parse_player(s(1))),
        "create_move" => api.create_move(s(0), n(1), n(2)),
        "login" => api.login(s(0), s(1)),
        "logout" => api.logout(),
        "register" => api.register(s(0), s(1), s(2), s(3), s(4), s(5)),
        "get_game" => api.get_game(s(0)),
        "who" => api.who(),
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let api = api();
        let args = case["args"].as_array().unwrap();
        run_operation(&api, case["operation"].as_str().unwrap(), args).unwrap();

        let req = api.http().transport().seen.lock().unwrap().take().unwrap();
        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

        if expected["body"].is_null() {
            assert!(req.body.is_none(), "{name}: body should be None");
        } else {
            assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
            let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(body, expected["body"], "{name}: body");
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let outcome = match case.get("network_error") {
            Some(message) => Err(TransportError::new(message.as_str().unwrap())),
            None => Ok(HttpResponse {
                status: case["response"]["status"].as_u64().unwrap() as u16,
                headers: Vec::new(),
                body: case["response"]["body"].as_str().unwrap().to_string(),
            }),
        };
        let api = api();
        *api.http().transport().outcome.lock().unwrap() = Some(outcome);
        let result = api.who();

        let expected = &case["expected"];
        let status = expected["status"].as_u64().map(|s| s as u16);
        if expected["ok"].as_bool().unwrap() {
            let ok = result.unwrap_or_else(|e| panic!("{name}: expected success, got {e:?}"));
            assert_eq!(Some(ok.status), status, "{name}: status");
            assert_eq!(ok.data, expected["data"], "{name}: data");
        } else {
            let err = result.expect_err(name);
            assert_eq!(err.status, status, "{name}: status");
            assert_eq!(err.message.as_deref(), expected["message"].as_str(), "{name}: message");
            assert_eq!(err.data, expected["data"], "{name}: data");
        }
    }
}
