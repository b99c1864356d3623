//! REST resources the client targets.

use std::fmt;

/// Every endpoint lives under this prefix.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Games,
    Game(String),
    Moves(String),
    Login,
    Logout,
    Register,
    Who,
}

impl Endpoint {
    pub fn game(id: impl fmt::Display) -> Self {
        Endpoint::Game(id.to_string())
    }

    pub fn moves(game_id: impl fmt::Display) -> Self {
        Endpoint::Moves(game_id.to_string())
    }

    /// Path relative to the server origin, prefix included.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Games => format!("{API_PREFIX}/games"),
            Endpoint::Game(id) => format!("{API_PREFIX}/games/{id}"),
            Endpoint::Moves(id) => format!("{API_PREFIX}/games/{id}/moves"),
            Endpoint::Login => format!("{API_PREFIX}/login"),
            Endpoint::Logout => format!("{API_PREFIX}/logout"),
            Endpoint::Register => format!("{API_PREFIX}/register"),
            Endpoint::Who => format!("{API_PREFIX}/who"),
        }
    }
}
