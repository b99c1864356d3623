//! One method per server operation.
//!
//! Every method is a direct call into [`HttpClient`] with a fixed endpoint
//! and a shaped payload. Nothing is validated or cached here; the server
//! owns the rules.

use std::fmt::Display;

use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::filters::Filters;
use crate::http::Transport;
use crate::result::ApiResult;
use crate::transport::UreqTransport;
use crate::types::{Credentials, Empty, JoinGame, NewGame, NewMove, Player, Registration};

#[derive(Debug, Clone)]
pub struct GameApi<T> {
    http: HttpClient<T>,
}

impl GameApi<UreqTransport> {
    /// Build an API over a fresh network transport.
    pub fn connect(config: &ClientConfig) -> Self {
        let transport = UreqTransport::new(config.transport.clone());
        Self::new(HttpClient::new(&config.base_url, transport))
    }
}

impl<T: Transport> GameApi<T> {
    pub fn new(http: HttpClient<T>) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    pub fn create_game(&self, name: &str) -> ApiResult {
        let body = NewGame {
            name: name.to_string(),
        };
        self.http.post(&Endpoint::Games, &body)
    }

    pub fn list_games(&self) -> ApiResult {
        self.http.get(&Endpoint::Games, &Filters::new())
    }

    /// Take a seat in a game.
    pub fn update_game(&self, game_id: impl Display, player: Player) -> ApiResult {
        self.http.put(&Endpoint::game(game_id), &JoinGame { player })
    }

    pub fn create_move(&self, game_id: impl Display, x: i64, y: i64) -> ApiResult {
        self.http.post(&Endpoint::moves(game_id), &NewMove { x, y })
    }

    pub fn login(&self, username: &str, password: &str) -> ApiResult {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.http.post(&Endpoint::Login, &body)
    }

    pub fn logout(&self) -> ApiResult {
        self.http.post(&Endpoint::Logout, &Empty {})
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        password2: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> ApiResult {
        let body = Registration {
            username: username.to_string(),
            password: password.to_string(),
            password2: password2.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.http.post(&Endpoint::Register, &body)
    }

    pub fn get_game(&self, game_id: impl Display) -> ApiResult {
        self.http.get(&Endpoint::game(game_id), &Filters::new())
    }

    /// The user the current session belongs to.
    pub fn who(&self) -> ApiResult {
        self.http.get(&Endpoint::Who, &Filters::new())
    }
}
