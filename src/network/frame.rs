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

//! Length-prefixed framing: `<ascii decimal length>\0<payload>`.
//!
//! [`encode`] and [`decode`] work on one fixed read window. [`FrameCodec`]
//! buffers across reads and is what the server and the client actually use;
//! both produce and accept the same bytes on the wire.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{AppError, AppResult};

pub const SIZE_TERMINATOR: u8 = b'\0';

/// A size prefix this long without a terminator cannot be a valid frame.
const MAX_PREFIX_LEN: usize = 20;

/// Frames `payload` into a freshly allocated buffer.
pub fn encode(payload: &[u8]) -> BytesMut {
    let mut dst = BytesMut::with_capacity(payload.len() + MAX_PREFIX_LEN + 1);
    encode_into(payload, &mut dst);
    dst
}

pub fn encode_into(payload: &[u8], dst: &mut BytesMut) {
    let prefix = payload.len().to_string();
    dst.reserve(prefix.len() + 1 + payload.len());
    dst.put_slice(prefix.as_bytes());
    dst.put_u8(SIZE_TERMINATOR);
    dst.put_slice(payload);
}

/// Decodes the first frame of a single read window. Fails when the window
/// holds no terminator or fewer payload bytes than the prefix declares; never
/// returns a truncated payload.
pub fn decode(window: &[u8]) -> AppResult<&[u8]> {
    let terminator = window
        .iter()
        .position(|b| *b == SIZE_TERMINATOR)
        .ok_or_else(|| AppError::FramingError("missing size terminator".to_string()))?;
    let size = parse_size(&window[..terminator])?;
    let body = &window[terminator + 1..];
    if size > body.len() {
        return Err(AppError::FramingError(format!(
            "frame too large for read window: declared {} bytes, {} available",
            size,
            body.len()
        )));
    }
    Ok(&body[..size])
}

fn parse_size(prefix: &[u8]) -> AppResult<usize> {
    if prefix.is_empty() || !prefix.iter().all(u8::is_ascii_digit) {
        return Err(AppError::FramingError(format!(
            "invalid size prefix {:?}",
            String::from_utf8_lossy(prefix)
        )));
    }
    // all ascii digits, so the only failure left is overflow
    std::str::from_utf8(prefix)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| AppError::FramingError("size prefix overflows".to_string()))
}

/// Streaming codec used on both ends of a connection.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new(max_frame_size: usize) -> Self {
        FrameCodec { max_frame_size }
    }

    /// Checks whether `buffer` starts with a complete frame. Returns the
    /// header length and payload length, `Incomplete` when more bytes are
    /// needed, or a framing error that should close the connection.
    fn check(&self, buffer: &mut BytesMut) -> AppResult<(usize, usize)> {
        let terminator = match buffer.iter().position(|b| *b == SIZE_TERMINATOR) {
            Some(terminator) => terminator,
            None if buffer.len() > MAX_PREFIX_LEN => {
                return Err(AppError::FramingError(
                    "missing size terminator".to_string(),
                ));
            }
            None => return Err(AppError::Incomplete),
        };
        let size = parse_size(&buffer[..terminator])?;
        if size > self.max_frame_size {
            return Err(AppError::FramingError(format!(
                "frame of length {} is too large, limit is {}",
                size, self.max_frame_size
            )));
        }
        let header_len = terminator + 1;
        if buffer.len() < header_len + size {
            buffer.reserve(header_len + size - buffer.len());
            return Err(AppError::Incomplete);
        }
        Ok((header_len, size))
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = AppError;

    fn decode(&mut self, src: &mut BytesMut) -> AppResult<Option<BytesMut>> {
        match self.check(src) {
            Ok((header_len, size)) => {
                src.advance(header_len);
                Ok(Some(src.split_to(size)))
            }
            Err(AppError::Incomplete) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> AppResult<Option<BytesMut>> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() => Ok(None),
            None => Err(AppError::ConnectionClosed(
                "peer closed the connection mid-frame".to_string(),
            )),
        }
    }
}

impl Encoder<&[u8]> for FrameCodec {
    type Error = AppError;

    fn encode(&mut self, payload: &[u8], dst: &mut BytesMut) -> AppResult<()> {
        encode_into(payload, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[test]
    fn encode_writes_decimal_prefix() {
        let frame = encode(br#"{"task":"get_game"}"#);
        assert_eq!(&frame[..3], b"19\0");
        assert_eq!(&frame[3..], br#"{"task":"get_game"}"#);
    }

    #[test]
    fn empty_payload() {
        let frame = encode(b"");
        assert_eq!(&frame[..], b"0\0");
        assert_eq!(decode(&frame).unwrap(), b"");
    }

    #[test]
    fn decode_returns_exactly_declared_bytes() {
        assert_eq!(decode(b"3\0abcdef").unwrap(), b"abc");
    }

    #[test]
    fn oversize_frame_is_rejected_not_truncated() {
        // a 4096 byte window cannot hold a 5000 byte payload
        let payload = vec![b'x'; 5000];
        let frame = encode(&payload);
        let window = &frame[..4096];
        match decode(window) {
            Err(AppError::FramingError(msg)) => assert!(msg.contains("read window")),
            other => panic!("expected framing error, got {:?}", other),
        }
    }

    #[rstest]
    #[case::no_terminator(&b"12345"[..])]
    #[case::empty_prefix(&b"\0abc"[..])]
    #[case::not_digits(&b"1a\0abc"[..])]
    #[case::signed(&b"-1\0abc"[..])]
    #[case::overflow(&b"99999999999999999999999\0abc"[..])]
    fn malformed_windows(#[case] window: &[u8]) {
        assert!(matches!(decode(window), Err(AppError::FramingError(_))));
    }

    #[test]
    fn codec_waits_for_more_bytes() {
        let mut codec = FrameCodec::new(1024);
        let mut buffer = BytesMut::from(&b"11"[..]);
        assert!(codec.decode(&mut buffer).unwrap().is_none());
        buffer.extend_from_slice(b"\0hello");
        assert!(codec.decode(&mut buffer).unwrap().is_none());
        buffer.extend_from_slice(b" world");
        let frame = codec.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(&frame[..], b"hello world");
        assert!(buffer.is_empty());
    }

    #[test]
    fn codec_leaves_following_frame_buffered() {
        let mut codec = FrameCodec::new(1024);
        let mut buffer = encode(b"first");
        buffer.extend_from_slice(&encode(b"second"));
        assert_eq!(&codec.decode(&mut buffer).unwrap().unwrap()[..], b"first");
        assert_eq!(&codec.decode(&mut buffer).unwrap().unwrap()[..], b"second");
        assert!(codec.decode(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn codec_rejects_frames_over_limit() {
        let mut codec = FrameCodec::new(8);
        let mut buffer = BytesMut::from(&b"9\0"[..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(AppError::FramingError(_))
        ));
    }

    #[test]
    fn codec_rejects_runaway_prefix() {
        let mut codec = FrameCodec::new(1024);
        let mut buffer = BytesMut::from(&[b'1'; MAX_PREFIX_LEN + 1][..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(AppError::FramingError(_))
        ));
    }

    #[test]
    fn eof_mid_frame_is_connection_closed() {
        let mut codec = FrameCodec::new(1024);
        let mut buffer = BytesMut::from(&b"10\0abc"[..]);
        assert!(matches!(
            codec.decode_eof(&mut buffer),
            Err(AppError::ConnectionClosed(_))
        ));
        let mut empty = BytesMut::new();
        assert!(codec.decode_eof(&mut empty).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn frame_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let frame = encode(&payload);
            prop_assert_eq!(decode(&frame).unwrap(), &payload[..]);

            let mut codec = FrameCodec::new(4096);
            let mut buffer = frame.clone();
            let decoded = codec.decode(&mut buffer).unwrap().unwrap();
            prop_assert_eq!(&decoded[..], &payload[..]);
        }
    }
}
