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

use bytes::BytesMut;
use serde::Serialize;
use tracing::trace;

use crate::network::encode;
use crate::request::api::{
    CreateGameRequestHandler, GetGameRequestHandler, GetGamesForRoomRequestHandler, TaskHandler,
};
use crate::request::{GameTask, RequestContext};
use crate::AppResult;

/// general async handler
async fn execute_handler<H>(
    handler: H,
    request: H::Request,
    context: &RequestContext,
) -> AppResult<BytesMut>
where
    H: TaskHandler + Sync,
{
    let response = handler.handle_request(request, context).await?;
    encode_response(&response)
}

fn encode_response<R: Serialize>(response: &R) -> AppResult<BytesMut> {
    let payload = serde_json::to_vec(response)?;
    Ok(encode(&payload))
}

pub struct RequestProcessor;

impl RequestProcessor {
    /// Runs the handler selected by `task` and returns the framed reply.
    pub async fn process_request(task: GameTask, context: &RequestContext) -> AppResult<BytesMut> {
        trace!(
            "Processing {} for connection {}",
            task.kind().as_str(),
            context.connection_id
        );
        match task {
            GameTask::CreateGame(request) => {
                execute_handler(CreateGameRequestHandler, request, context).await
            }
            GameTask::GetGame(request) => {
                execute_handler(GetGameRequestHandler, request, context).await
            }
            GameTask::GetGamesForRoom(request) => {
                execute_handler(GetGamesForRoomRequestHandler, request, context).await
            }
        }
    }

    /// Parses a frame payload and processes it.
    pub async fn process_payload(payload: &[u8], context: &RequestContext) -> AppResult<BytesMut> {
        let task = GameTask::parse_from(payload)?;
        Self::process_request(task, context).await
    }
}
