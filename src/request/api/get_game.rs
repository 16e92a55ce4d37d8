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

use crate::game::{parse_game_id, GameView};
use crate::request::RequestContext;
use crate::AppResult;

use super::TaskHandler;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetGameRequest {
    pub game_id: String,
}

pub struct GetGameRequestHandler;
impl TaskHandler for GetGameRequestHandler {
    type Request = GetGameRequest;
    type Response = GameView;

    async fn handle_request(
        &self,
        request: GetGameRequest,
        context: &RequestContext,
    ) -> AppResult<GameView> {
        let id = parse_game_id(&request.game_id)?;
        let game = context.registry.get(&id).await?;
        Ok(game.view())
    }
}
