use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppResult};

/// A game record owned by the registry. Owner and room are opaque ids that
/// are stored and returned verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: Uuid,
    pub title: String,
    pub owner_id: String,
    pub room_id: String,
}

impl Game {
    pub fn view(&self) -> GameView {
        GameView {
            game_id: format_game_id(&self.id),
            title: self.title.clone(),
            owner_id: self.owner_id.clone(),
            room_id: self.room_id.clone(),
        }
    }
}

/// Wire shape of a game, shared by `get_game` and `get_games_for_room`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub game_id: String,
    pub title: String,
    pub owner_id: String,
    pub room_id: String,
}

/// Game ids travel as 32 lowercase hex digits.
pub fn format_game_id(id: &Uuid) -> String {
    id.simple().to_string()
}

/// Accepts both the simple and the hyphenated uuid forms.
pub fn parse_game_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::InvalidRequest(format!("game id {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_wire_form() {
        let id = Uuid::new_v4();
        let wire = format_game_id(&id);
        assert_eq!(wire.len(), 32);
        assert!(!wire.contains('-'));
        assert_eq!(parse_game_id(&wire).unwrap(), id);
        assert_eq!(parse_game_id(&id.hyphenated().to_string()).unwrap(), id);
    }

    #[test]
    fn garbage_id_is_invalid_request() {
        assert!(matches!(
            parse_game_id("not-a-game"),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
