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
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio_util::codec::Decoder;

use crate::network::FrameCodec;
use crate::AppResult;

/// Read side of a client connection.
///
/// Bytes are accumulated in `buffer` until the codec can cut a complete frame
/// out of it, so frames larger than one socket read are supported.
#[derive(Debug)]
pub struct Connection {
    reader: OwnedReadHalf,
    buffer: BytesMut,
    codec: FrameCodec,
    pub client_ip: String,
}

impl Connection {
    pub fn new(reader: OwnedReadHalf, buffer_size: usize, codec: FrameCodec) -> Connection {
        let client_ip = reader
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Connection {
            reader,
            buffer: BytesMut::with_capacity(buffer_size),
            codec,
            client_ip,
        }
    }

    /// Reads one frame payload from the connection.
    ///
    /// A malformed or oversized frame is an error and the connection should be
    /// closed. `None` means the client closed the connection on a frame
    /// boundary; closing in the middle of a frame is an error.
    pub async fn read_frame(&mut self) -> AppResult<Option<BytesMut>> {
        loop {
            if let Some(frame) = self.codec.decode(&mut self.buffer)? {
                return Ok(Some(frame));
            }
            if 0 == self.reader.read_buf(&mut self.buffer).await? {
                return self.codec.decode_eof(&mut self.buffer);
            }
        }
    }
}
