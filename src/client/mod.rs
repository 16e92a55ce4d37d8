//! Caller-side stub: one short-lived connection per request.

use std::io::ErrorKind;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;
use uuid::Uuid;

use crate::game::{format_game_id, parse_game_id, GameView};
use crate::network::{encode, FrameCodec};
use crate::request::{CreateGameResponse, ErrorResponse, GetGamesForRoomResponse};
use crate::utils::with_timeout;
use crate::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct GameServiceClient {
    addr: String,
    max_reply_size: usize,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl GameServiceClient {
    /// No timeouts and no bound on the reply size. The service never caps a
    /// reply, so a busy room may list more than its request frame limit.
    pub fn new(addr: impl Into<String>) -> Self {
        GameServiceClient {
            addr: addr.into(),
            max_reply_size: usize::MAX,
            read_timeout: None,
            write_timeout: None,
        }
    }

    pub fn with_timeouts(mut self, read: Option<Duration>, write: Option<Duration>) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    pub fn with_max_reply_size(mut self, max_reply_size: usize) -> Self {
        self.max_reply_size = max_reply_size;
        self
    }

    /// Sends one request object and returns the reply object.
    ///
    /// Fails with `ConnectionClosed` when the service hangs up without
    /// replying, which is how it reports every request failure unless error
    /// replies are enabled; those come back as `RemoteError`. A reset or
    /// truncated connection counts as closed too.
    pub async fn call(&self, request: &Value) -> AppResult<Value> {
        let payload = serde_json::to_vec(request)?;
        let stream = TcpStream::connect(&self.addr).await?;
        let (reader, mut writer) = stream.into_split();

        let frame = encode(&payload);
        with_timeout(self.write_timeout, "sending request", async {
            writer.write_all(&frame).await?;
            writer.flush().await?;
            Ok::<(), AppError>(())
        })
        .await
        .map_err(peer_closed)?;

        let mut frames = FramedRead::new(reader, FrameCodec::new(self.max_reply_size));
        let reply = with_timeout(self.read_timeout, "awaiting reply", async {
            frames.next().await.transpose()
        })
        .await
        .map_err(peer_closed)?
        .ok_or_else(|| {
            AppError::ConnectionClosed("service closed the connection before replying".to_string())
        })?;

        let value: Value = serde_json::from_slice(&reply)?;
        if is_error_reply(&value) {
            let ErrorResponse { error } = serde_json::from_value(value)?;
            return Err(AppError::RemoteError {
                kind: error.kind,
                message: error.message,
            });
        }
        Ok(value)
    }

    pub async fn create_game(&self, owner: &str, room: &str, title: &str) -> AppResult<Uuid> {
        let reply = self
            .call(&json!({
                "task": "create_game",
                "owner": owner,
                "room": room,
                "title": title,
            }))
            .await?;
        let CreateGameResponse { game_id } = serde_json::from_value(reply)?;
        parse_game_id(&game_id)
    }

    pub async fn get_game(&self, game_id: &Uuid) -> AppResult<GameView> {
        let reply = self
            .call(&json!({
                "task": "get_game",
                "game_id": format_game_id(game_id),
            }))
            .await?;
        Ok(serde_json::from_value(reply)?)
    }

    pub async fn get_games_for_room(&self, room_id: &str) -> AppResult<Vec<GameView>> {
        let reply = self
            .call(&json!({
                "task": "get_games_for_room",
                "room_id": room_id,
            }))
            .await?;
        let GetGamesForRoomResponse { games } = serde_json::from_value(reply)?;
        Ok(games)
    }
}

fn peer_closed(err: AppError) -> AppError {
    match err {
        AppError::IoError(e)
            if matches!(
                e.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ) =>
        {
            AppError::ConnectionClosed(format!("service dropped the connection: {e}"))
        }
        other => other,
    }
}

/// Regular replies never carry an `error` key, so a lone one marks a failure.
fn is_error_reply(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.len() == 1 && object.contains_key("error"))
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;
    use crate::network::decode;

    /// Accepts one connection, reads one request and answers with `reply`
    /// (or hangs up when `reply` is `None`).
    async fn one_shot_peer(reply: Option<Vec<u8>>) -> (String, tokio::task::JoinHandle<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = vec![0u8; 4096];
            let mut read = 0;
            let request = loop {
                read += socket.read(&mut buffer[read..]).await.unwrap();
                if let Ok(payload) = decode(&buffer[..read]) {
                    break serde_json::from_slice::<Value>(payload).unwrap();
                }
            };
            if let Some(reply) = reply {
                socket.write_all(&reply).await.unwrap();
            }
            request
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn call_sends_one_frame_and_parses_reply() {
        let (addr, peer) = one_shot_peer(Some(encode(br#"{"games":[]}"#).to_vec())).await;
        let client = GameServiceClient::new(addr);
        let games = client.get_games_for_room("r-1").await.unwrap();
        assert!(games.is_empty());
        let request = peer.await.unwrap();
        assert_eq!(request, json!({"task": "get_games_for_room", "room_id": "r-1"}));
    }

    #[tokio::test]
    async fn hang_up_is_connection_closed() {
        let (addr, _peer) = one_shot_peer(None).await;
        let result = GameServiceClient::new(addr).call(&json!({"task": "get_game"})).await;
        assert!(matches!(result, Err(AppError::ConnectionClosed(_))));
    }

    #[tokio::test]
    async fn error_reply_is_remote_error() {
        let reply = encode(br#"{"error":{"kind":"not_found","message":"game not found: x"}}"#);
        let (addr, _peer) = one_shot_peer(Some(reply.to_vec())).await;
        let result = GameServiceClient::new(addr)
            .get_game(&Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::RemoteError { kind, .. }) if kind == "not_found"));
    }

    #[tokio::test]
    async fn garbage_reply_is_framing_error() {
        let (addr, _peer) = one_shot_peer(Some(b"abcdefghijklmnopqrstuvwxyz".to_vec())).await;
        let result = GameServiceClient::new(addr).call(&json!({"task": "get_game"})).await;
        assert!(matches!(result, Err(AppError::FramingError(_))));
    }

    #[tokio::test]
    async fn reset_is_connection_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut first = [0u8; 1];
            socket.read_exact(&mut first).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            // unread request bytes turn the close into a reset
            drop(socket);
        });
        let result = GameServiceClient::new(addr)
            .call(&json!({"task": "get_games_for_room", "room_id": "r-1"}))
            .await;
        assert!(matches!(result, Err(AppError::ConnectionClosed(_))), "{result:?}");
    }

    #[tokio::test]
    async fn silent_peer_hits_read_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let _peer = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });
        let client = GameServiceClient::new(addr)
            .with_timeouts(Some(Duration::from_millis(200)), Some(Duration::from_secs(1)));
        let result = client.get_games_for_room("r-1").await;
        assert!(matches!(result, Err(AppError::Timeout(_))), "{result:?}");
    }

    #[tokio::test]
    async fn reply_limit_is_opt_in() {
        let reply = encode(br#"{"games":[{"game_id":"0","title":"t","owner_id":"o","room_id":"r"}]}"#);
        let (addr, _peer) = one_shot_peer(Some(reply.to_vec())).await;
        let result = GameServiceClient::new(addr)
            .with_max_reply_size(16)
            .get_games_for_room("r")
            .await;
        assert!(matches!(result, Err(AppError::FramingError(_))));
    }

    #[test]
    fn error_reply_detection() {
        assert!(is_error_reply(&json!({"error": {"kind": "x", "message": "y"}})));
        assert!(!is_error_reply(&json!({"game_id": "abc"})));
        assert!(!is_error_reply(&json!({"games": [], "error": null})));
    }
}
