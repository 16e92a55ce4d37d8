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
use tracing::info;

use crate::game::format_game_id;
use crate::request::RequestContext;
use crate::AppResult;

use super::TaskHandler;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub owner: String,
    pub room: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: String,
}

pub struct CreateGameRequestHandler;
impl TaskHandler for CreateGameRequestHandler {
    type Request = CreateGameRequest;
    type Response = CreateGameResponse;

    async fn handle_request(
        &self,
        request: CreateGameRequest,
        context: &RequestContext,
    ) -> AppResult<CreateGameResponse> {
        let CreateGameRequest { owner, room, title } = request;
        let id = context.registry.create(title, owner, room).await;
        let game_id = format_game_id(&id);
        info!(
            game_id = %game_id,
            connection_id = context.connection_id,
            client = %context.client_ip,
            "new game"
        );
        Ok(CreateGameResponse { game_id })
    }
}
