pub use record::{format_game_id, parse_game_id, Game, GameView};
pub use registry::GameRegistry;

mod record;
mod registry;
