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

use std::sync::Arc;

use crate::game::GameRegistry;

/// Everything a handler may touch while serving one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub connection_id: u64,
    pub client_ip: String,
    pub registry: Arc<GameRegistry>,
}

impl RequestContext {
    pub fn new(connection_id: u64, client_ip: String, registry: Arc<GameRegistry>) -> Self {
        RequestContext {
            connection_id,
            client_ip,
            registry,
        }
    }
}
