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

//! Network module: framing and the read side of client connections.
//!
//! - `frame`: the `<length>\0<payload>` codec shared by server and client
//! - `Connection`: buffers socket reads and yields one frame payload at a time

pub use connection::Connection;
pub use frame::{decode, encode, FrameCodec};
mod connection;
mod frame;
