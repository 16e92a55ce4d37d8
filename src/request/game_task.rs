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

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::request::{CreateGameRequest, GetGameRequest, GetGamesForRoomRequest};
use crate::{AppError, AppResult};

/// Key selecting the handler in every request object.
pub const TASK_KEY: &str = "task";

/// The closed set of tasks the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    CreateGame,
    GetGame,
    GetGamesForRoom,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::CreateGame => "create_game",
            TaskKind::GetGame => "get_game",
            TaskKind::GetGamesForRoom => "get_games_for_room",
        }
    }
}

impl FromStr for TaskKind {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "create_game" => Ok(TaskKind::CreateGame),
            "get_game" => Ok(TaskKind::GetGame),
            "get_games_for_room" => Ok(TaskKind::GetGamesForRoom),
            other => Err(AppError::UnknownTask(other.to_string())),
        }
    }
}

/// A decoded request, one variant per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTask {
    CreateGame(CreateGameRequest),
    GetGame(GetGameRequest),
    GetGamesForRoom(GetGamesForRoomRequest),
}

impl GameTask {
    pub fn kind(&self) -> TaskKind {
        match self {
            GameTask::CreateGame(_) => TaskKind::CreateGame,
            GameTask::GetGame(_) => TaskKind::GetGame,
            GameTask::GetGamesForRoom(_) => TaskKind::GetGamesForRoom,
        }
    }

    /// Parses one frame payload. Only the fields the selected task needs are
    /// checked; anything else in the object is ignored.
    pub fn parse_from(payload: &[u8]) -> AppResult<GameTask> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| AppError::InvalidRequest(format!("payload is not json: {e}")))?;
        let kind = match value.get(TASK_KEY) {
            Some(Value::String(task)) => task.parse::<TaskKind>()?,
            Some(other) => {
                return Err(AppError::InvalidRequest(format!(
                    "task must be a string, got {other}"
                )))
            }
            None => {
                return Err(AppError::InvalidRequest(
                    "request has no task field".to_string(),
                ))
            }
        };
        let task = match kind {
            TaskKind::CreateGame => GameTask::CreateGame(fields(kind, value)?),
            TaskKind::GetGame => GameTask::GetGame(fields(kind, value)?),
            TaskKind::GetGamesForRoom => GameTask::GetGamesForRoom(fields(kind, value)?),
        };
        Ok(task)
    }
}

fn fields<T: DeserializeOwned>(kind: TaskKind, value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::InvalidRequest(format!("{}: {}", kind.as_str(), e)))
}
