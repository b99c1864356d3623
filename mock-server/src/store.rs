use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub const BOARD_SIZE: i64 = 3;

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub user_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    X,
    O,
}

impl Seat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "x" => Some(Seat::X),
            "o" => Some(Seat::O),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Seat::X => Seat::O,
            Seat::O => Seat::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seat::X => "x",
            Seat::O => "o",
        }
    }

    pub fn turn(self) -> String {
        format!("turn_{}", self.as_str())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Move {
    pub player: Seat,
    pub x: i64,
    pub y: i64,
}

#[derive(Clone, Debug)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub player_x: Option<u64>,
    pub player_o: Option<u64>,
    pub moves: Vec<Move>,
}

impl Game {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            state: Seat::X.turn(),
            player_x: None,
            player_o: None,
            moves: Vec::new(),
        }
    }

    pub fn seat(&self, seat: Seat) -> Option<u64> {
        match seat {
            Seat::X => self.player_x,
            Seat::O => self.player_o,
        }
    }

    pub fn seat_mut(&mut self, seat: Seat) -> &mut Option<u64> {
        match seat {
            Seat::X => &mut self.player_x,
            Seat::O => &mut self.player_o,
        }
    }

    pub fn seat_of(&self, user_id: u64) -> Option<Seat> {
        [Seat::X, Seat::O]
            .into_iter()
            .find(|seat| self.seat(*seat) == Some(user_id))
    }

    pub fn is_occupied(&self, x: i64, y: i64) -> bool {
        self.moves.iter().any(|m| m.x == x && m.y == y)
    }

    /// Rows of cells indexed `[y][x]`.
    pub fn board(&self) -> Vec<Vec<Option<Seat>>> {
        let mut board = vec![vec![None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for m in &self.moves {
            board[m.y as usize][m.x as usize] = Some(m.player);
        }
        board
    }
}

/// Everything the server knows, in memory.
#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<User>,
    pub sessions: HashMap<String, SessionRecord>,
    pub games: Vec<Game>,
}

impl Store {
    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_name(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn add_user(&mut self, mut user: User) -> &User {
        user.id = self.users.len() as u64 + 1;
        self.users.push(user);
        &self.users[self.users.len() - 1]
    }

    pub fn game(&self, id: &str) -> Option<&Game> {
        let id = Uuid::parse_str(id).ok()?;
        self.games.iter().find(|g| g.id == id)
    }

    pub fn game_mut(&mut self, id: &str) -> Option<&mut Game> {
        let id = Uuid::parse_str(id).ok()?;
        self.games.iter_mut().find(|g| g.id == id)
    }

    pub fn game_json(&self, game: &Game) -> Value {
        let player = |id: Option<u64>| {
            id.and_then(|id| self.user(id))
                .map_or(Value::Null, |u| json!(u))
        };
        json!({
            "id": game.id,
            "name": game.name,
            "state": game.state,
            "player_o": player(game.player_o),
            "player_x": player(game.player_x),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_with_x() {
        let game = Game::new("g".to_string());
        assert_eq!(game.state, "turn_x");
        assert!(game.board().iter().flatten().all(Option::is_none));
    }

    #[test]
    fn board_is_indexed_by_row() {
        let mut game = Game::new("g".to_string());
        game.moves.push(Move {
            player: Seat::O,
            x: 2,
            y: 0,
        });
        assert_eq!(game.board()[0][2], Some(Seat::O));
        assert!(game.is_occupied(2, 0));
        assert!(!game.is_occupied(0, 2));
    }

    #[test]
    fn user_password_is_not_serialized() {
        let user = User {
            id: 1,
            username: "ann".to_string(),
            email: "a@x.com".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            password: "secret".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "ann");
    }

    #[test]
    fn unknown_or_malformed_game_ids() {
        let store = Store::default();
        assert!(store.game("not-a-uuid").is_none());
        assert!(store.game("00000000-0000-0000-0000-000000000000").is_none());
    }
}
