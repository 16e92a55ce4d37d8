//! In-memory game coordination service.
//!
//! Clients speak a length-prefixed JSON protocol over TCP: every frame is
//! `<ascii decimal length>\0<payload>` and every payload is a JSON object.
//! Requests carry a `task` key selecting one of `create_game`, `get_game`
//! or `get_games_for_room`. Games live in a [`GameRegistry`] for as long as
//! the service runs.

mod client;
mod game;
mod network;
mod request;
mod service;
mod utils;

pub use client::GameServiceClient;
pub use game::{format_game_id, parse_game_id, Game, GameRegistry, GameView};
pub use network::{decode, encode, FrameCodec};
pub use request::{
    CreateGameRequest, CreateGameResponse, ErrorBody, ErrorResponse, GameTask, GetGameRequest,
    GetGamesForRoomRequest, GetGamesForRoomResponse, RequestContext, RequestProcessor, TaskKind,
};
pub use service::{
    setup_local_tracing, setup_tracing, verbosity_directive, AppError, AppResult, Coordinator,
    CoordinatorConfig, GeneralConfig, NetworkConfig, RunningCoordinator, Shutdown, TracingGuard,
};
