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

use serde::{Deserialize, Serialize};

use crate::game::GameView;
use crate::request::RequestContext;
use crate::AppResult;

use super::TaskHandler;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGamesForRoomRequest {
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGamesForRoomResponse {
    pub games: Vec<GameView>,
}

pub struct GetGamesForRoomRequestHandler;
impl TaskHandler for GetGamesForRoomRequestHandler {
    type Request = GetGamesForRoomRequest;
    type Response = GetGamesForRoomResponse;

    async fn handle_request(
        &self,
        request: GetGamesForRoomRequest,
        context: &RequestContext,
    ) -> AppResult<GetGamesForRoomResponse> {
        let games = context
            .registry
            .list_by_room(&request.room_id)
            .await
            .iter()
            .map(|game| game.view())
            .collect();
        Ok(GetGamesForRoomResponse { games })
    }
}
