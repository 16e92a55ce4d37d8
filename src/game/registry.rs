use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::trace;
use uuid::Uuid;

use super::record::format_game_id;
use super::Game;
use crate::{AppError, AppResult};

#[derive(Debug, Default)]
struct GameTable {
    /// creation order
    games: Vec<Game>,
    by_id: HashMap<Uuid, usize>,
    by_room: HashMap<String, Vec<usize>>,
}

/// In-memory store of games created through the protocol.
///
/// All access goes through one mutex over the whole table. Creates are
/// totally ordered by lock acquisition and every read observes a state
/// either before or after any given create. Nothing survives the process.
#[derive(Debug, Default)]
pub struct GameRegistry {
    table: Mutex<GameTable>,
}

impl GameRegistry {
    pub fn new() -> Self {
        GameRegistry::default()
    }

    /// Registers a new game and returns the id the registry assigned to it.
    pub async fn create(
        &self,
        title: impl Into<String>,
        owner_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Uuid {
        let mut table = self.table.lock().await;
        let id = loop {
            let candidate = Uuid::new_v4();
            if !table.by_id.contains_key(&candidate) {
                break candidate;
            }
        };
        let game = Game {
            id,
            title: title.into(),
            owner_id: owner_id.into(),
            room_id: room_id.into(),
        };
        let index = table.games.len();
        table.by_id.insert(id, index);
        table
            .by_room
            .entry(game.room_id.clone())
            .or_default()
            .push(index);
        table.games.push(game);
        trace!("registered game {} at slot {}", format_game_id(&id), index);
        id
    }

    pub async fn get(&self, id: &Uuid) -> AppResult<Game> {
        let table = self.table.lock().await;
        table
            .by_id
            .get(id)
            .map(|index| table.games[*index].clone())
            .ok_or_else(|| AppError::GameNotFound(format_game_id(id)))
    }

    /// Snapshot of the games in `room_id`, in creation order.
    pub async fn list_by_room(&self, room_id: &str) -> Vec<Game> {
        let table = self.table.lock().await;
        table
            .by_room
            .get(room_id)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|index| table.games[*index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.games.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
