// Copyright 2025 jonefeewang@gmail.com
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod create_game;
mod get_game;
mod get_games_for_room;
mod handler;

pub use create_game::{CreateGameRequest, CreateGameRequestHandler, CreateGameResponse};
pub use get_game::{GetGameRequest, GetGameRequestHandler};
pub use get_games_for_room::{
    GetGamesForRoomRequest, GetGamesForRoomRequestHandler, GetGamesForRoomResponse,
};
pub use handler::TaskHandler;
