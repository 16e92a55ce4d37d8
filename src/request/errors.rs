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
use serde::{Deserialize, Serialize};

use crate::network::encode;
use crate::AppError;

/// Optional reply sent instead of closing the connection when a handler fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn encode(&self) -> BytesMut {
        // a struct of two strings always serializes
        let payload = serde_json::to_vec(self).unwrap_or_default();
        encode(&payload)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(value: &AppError) -> Self {
        ErrorResponse {
            error: ErrorBody {
                kind: value.kind().to_string(),
                message: value.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::decode;

    #[test]
    fn not_found_reply_shape() {
        let frame = ErrorResponse::from(&AppError::GameNotFound("abc".into())).encode();
        let value: serde_json::Value = serde_json::from_slice(decode(&frame).unwrap()).unwrap();
        assert_eq!(value["error"]["kind"], "not_found");
        assert_eq!(value["error"]["message"], "game not found: abc");
    }
}
