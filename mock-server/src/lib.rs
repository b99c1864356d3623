//! In-memory stand-in for the Tic-To-Tac-To-Toe REST API.
//!
//! Serves the `/api/v1` surface with session cookies and CSRF checks so the
//! client can be exercised end-to-end. Win and tie detection are not
//! implemented; moves only alternate turns.

mod store;

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub use store::{Game, Move, Seat, SessionRecord, Store, User, BOARD_SIZE};

pub const SESSION_COOKIE: &str = "sessionid";
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "x-csrftoken";

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateGame {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct JoinGame {
    pub player: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateMove {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

#[derive(Deserialize)]
pub struct GamesQuery {
    pub name: Option<String>,
    pub state: Option<String>,
}

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{game_id}", get(get_game).put(join_game))
        .route("/games/{game_id}/moves", post(create_move))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/register", post(register))
        .route("/who", get(who));
    Router::new().nest("/api/v1", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

/// `{data, status, message}` wrapper used by the game and auth endpoints.
fn envelope(code: StatusCode, data: Value, message: impl Into<String>) -> Response {
    let status = if code.is_success() { "ok" } else { "error" };
    let body = json!({
        "data": data,
        "status": status,
        "message": message.into(),
    });
    (code, Json(body)).into_response()
}

fn forbidden(detail: &str) -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "detail": detail }))).into_response()
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value().to_string())
}

/// Resolve the session user. Unsafe methods must also echo the CSRF cookie.
fn authenticate(store: &Store, headers: &HeaderMap, check_csrf: bool) -> Result<u64, Response> {
    let user_id = cookie(headers, SESSION_COOKIE)
        .and_then(|sid| store.sessions.get(&sid))
        .map(|session| session.user_id)
        .ok_or_else(|| forbidden("Authentication credentials were not provided."))?;
    if check_csrf {
        let token = cookie(headers, CSRF_COOKIE);
        let echoed = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
        if token.is_none() || token.as_deref() != echoed {
            return Err(forbidden("CSRF Failed: CSRF token missing or incorrect."));
        }
    }
    Ok(user_id)
}

async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Response {
    let mut store = db.write().await;
    let user_id = match (&input.username, &input.password) {
        (Some(username), Some(password)) => store
            .user_by_name(username)
            .filter(|u| &u.password == password)
            .map(|u| u.id),
        _ => None,
    };
    let Some(user_id) = user_id else {
        return envelope(StatusCode::BAD_REQUEST, json!({}), "Invalid credentials.");
    };
    let sid = Uuid::new_v4().simple().to_string();
    let csrf = Uuid::new_v4().simple().to_string();
    store.sessions.insert(sid.clone(), SessionRecord { user_id });
    debug!(user_id, "logged in");
    let jar = CookieJar::new()
        .add(Cookie::build((CSRF_COOKIE, csrf)).path("/").same_site(SameSite::Lax))
        .add(
            Cookie::build((SESSION_COOKIE, sid))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        );
    (
        jar,
        envelope(StatusCode::ACCEPTED, json!({}), "Success kid is successful!"),
    )
        .into_response()
}

async fn logout(State(db): State<Db>, headers: HeaderMap) -> Response {
    let mut store = db.write().await;
    let user_id = match authenticate(&store, &headers, true) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let jar = CookieJar::from_headers(&headers);
    if let Some(sid) = jar.get(SESSION_COOKIE) {
        store.sessions.remove(sid.value());
    }
    let username = store.user(user_id).map(|u| u.username.clone()).unwrap_or_default();
    debug!(user_id, "logged out");
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        envelope(
            StatusCode::ACCEPTED,
            json!({}),
            format!("User {username} has logged out successfully! bye-bye."),
        ),
    )
        .into_response()
}

async fn register(State(db): State<Db>, Json(input): Json<RegisterRequest>) -> Response {
    let mut store = db.write().await;
    let mut errors: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let fields = [
        ("username", &input.username),
        ("password", &input.password),
        ("password2", &input.password2),
        ("email", &input.email),
        ("first_name", &input.first_name),
        ("last_name", &input.last_name),
    ];
    for (name, value) in fields {
        if value.as_deref().is_none_or(str::is_empty) {
            errors
                .entry(name)
                .or_default()
                .push("This field is required.".to_string());
        }
    }
    if errors.is_empty() {
        if input.password != input.password2 {
            errors
                .entry("password")
                .or_default()
                .push("Password fields didn't match.".to_string());
        }
        if let Some(username) = &input.username {
            if store.user_by_name(username).is_some() {
                errors
                    .entry("username")
                    .or_default()
                    .push("A user with that username already exists.".to_string());
            }
        }
        if store.users.iter().any(|u| Some(&u.email) == input.email.as_ref()) {
            errors
                .entry("email")
                .or_default()
                .push("This field must be unique.".to_string());
        }
    }
    if !errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!(errors))).into_response();
    }
    let user = store.add_user(User {
        id: 0,
        username: input.username.unwrap_or_default(),
        email: input.email.unwrap_or_default(),
        first_name: input.first_name.unwrap_or_default(),
        last_name: input.last_name.unwrap_or_default(),
        password: input.password.unwrap_or_default(),
    });
    debug!(user_id = user.id, "registered");
    (StatusCode::CREATED, Json(json!(user))).into_response()
}

async fn who(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    let user_id = match authenticate(&store, &headers, false) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let data = store.user(user_id).map_or(json!({}), |u| json!(u));
    envelope(StatusCode::OK, data, "This is who you are!")
}

async fn list_games(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<GamesQuery>,
) -> Response {
    let store = db.read().await;
    if let Err(resp) = authenticate(&store, &headers, false) {
        return resp;
    }
    let games: Vec<Value> = store
        .games
        .iter()
        .filter(|g| query.name.as_ref().is_none_or(|name| &g.name == name))
        .filter(|g| query.state.as_ref().is_none_or(|state| &g.state == state))
        .map(|g| store.game_json(g))
        .collect();
    envelope(StatusCode::OK, json!(games), "Here are the games!")
}

async fn create_game(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateGame>,
) -> Response {
    let mut store = db.write().await;
    if let Err(resp) = authenticate(&store, &headers, true) {
        return resp;
    }
    let name = input.name.trim();
    if name.is_empty() {
        return envelope(
            StatusCode::BAD_REQUEST,
            json!({}),
            "{'name': ['This field may not be blank.']}",
        );
    }
    let game = Game::new(name.to_string());
    let data = store.game_json(&game);
    debug!(game_id = %game.id, "game created");
    store.games.push(game);
    envelope(StatusCode::CREATED, data, "Game was created!")
}

async fn get_game(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
) -> Response {
    let store = db.read().await;
    if let Err(resp) = authenticate(&store, &headers, false) {
        return resp;
    }
    let Some(game) = store.game(&game_id) else {
        return envelope(StatusCode::NOT_FOUND, json!({}), "Game not found!");
    };
    let mut data = store.game_json(game);
    data["moves"] = json!(game.board());
    envelope(StatusCode::OK, data, "Look at this awesome game!")
}

async fn join_game(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
    Json(input): Json<JoinGame>,
) -> Response {
    let mut store = db.write().await;
    let user_id = match authenticate(&store, &headers, true) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(seat) = input.player.as_deref().and_then(Seat::parse) else {
        return envelope(StatusCode::BAD_REQUEST, json!({}), "Player must be x or o.");
    };
    let Some(game) = store.game_mut(&game_id) else {
        return envelope(StatusCode::NOT_FOUND, json!({}), "Game not found!");
    };
    if game.seat(seat).is_some() {
        return envelope(
            StatusCode::BAD_REQUEST,
            json!({}),
            format!("Someone is already {}", seat.as_str()),
        );
    }
    if game.seat(seat.other()) == Some(user_id) {
        return envelope(
            StatusCode::BAD_REQUEST,
            json!({}),
            "Cannot be the same user for both players!",
        );
    }
    *game.seat_mut(seat) = Some(user_id);
    debug!(user_id, seat = seat.as_str(), "seat taken");
    envelope(
        StatusCode::ACCEPTED,
        json!({}),
        format!("Set as player {}", seat.as_str()),
    )
}

async fn create_move(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(game_id): Path<String>,
    Json(input): Json<CreateMove>,
) -> Response {
    let mut store = db.write().await;
    let user_id = match authenticate(&store, &headers, true) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let username = store.user(user_id).map(|u| u.username.clone()).unwrap_or_default();
    let Some(game) = store.game_mut(&game_id) else {
        return envelope(StatusCode::NOT_FOUND, json!({}), "Game not found!");
    };
    let bad_request = |message: String| envelope(StatusCode::BAD_REQUEST, json!({}), message);

    if game.player_x.is_none() || game.player_o.is_none() {
        return bad_request("Not all players are ready. Please wait!".to_string());
    }
    let Some(seat) = game.seat_of(user_id) else {
        return bad_request(format!("Sorry {username} is not part of this game!"));
    };
    let (Some(x), Some(y)) = (input.x, input.y) else {
        return bad_request("Both x and y are required.".to_string());
    };
    if !game.state.starts_with("turn_") {
        return bad_request("Game is over!".to_string());
    }
    if !(0..BOARD_SIZE).contains(&x) || !(0..BOARD_SIZE).contains(&y) {
        return bad_request("Move was not valid. Please try a different move!".to_string());
    }
    let other = seat.other();
    if game.state != seat.turn() {
        return bad_request(format!(
            "It is not your turn {}! Sorry, please wait for {}.",
            seat.as_str(),
            other.as_str()
        ));
    }
    if game.is_occupied(x, y) {
        return bad_request("I am sorry a player already placed a move here!".to_string());
    }
    let placed = Move { player: seat, x, y };
    game.moves.push(placed.clone());
    game.state = other.turn();
    debug!(game_id = %game.id, x, y, seat = seat.as_str(), "move placed");
    envelope(
        StatusCode::CREATED,
        json!(placed),
        format!("Move accepted! Now it is {}'s turn.", other.as_str()),
    )
}
