use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::game::GameRegistry;
use crate::network::{Connection, FrameCodec};
use crate::request::{ErrorResponse, RequestContext, RequestProcessor};
use crate::utils::with_timeout;
use crate::{AppError, AppResult};

use super::config::CoordinatorConfig;
use super::Shutdown;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

// handler for each connection
struct ConnectionHandler {
    shutdown: Shutdown,
    _shutdown_complete_tx: mpsc::Sender<()>,
    connection: Connection,
    writer: BufWriter<OwnedWriteHalf>,
    context: RequestContext,
    error_responses: bool,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl ConnectionHandler {
    /// Serves requests one at a time until the client leaves, a frame or
    /// handler fails, a timeout expires or the service shuts down.
    async fn handle_connection(&mut self) -> AppResult<()> {
        let connection_id = self.context.connection_id;
        loop {
            let read_timeout = self.read_timeout;
            let read = with_timeout(read_timeout, "awaiting frame", self.connection.read_frame());
            let maybe_frame = tokio::select! {
                res = read => res?,
                _ = self.shutdown.recv() => {
                    debug!("connection handler exit read loop after recv shutdown signal");
                    return Ok(());
                }
            };

            let payload = match maybe_frame {
                Some(payload) => payload,
                // client close the connection gracefully
                None => break,
            };

            let response = match RequestProcessor::process_payload(&payload, &self.context).await {
                Ok(response) => response,
                Err(e) if self.error_responses && e.is_handler_error() => {
                    warn!(
                        kind = e.kind(),
                        connection_id, "request failed, sending error reply: {}", e
                    );
                    ErrorResponse::from(&e).encode()
                }
                Err(e) => {
                    // no error envelope: close without a reply
                    error!(
                        kind = e.kind(),
                        connection_id, "request failed, closing connection: {}", e
                    );
                    return Ok(());
                }
            };

            let write_timeout = self.write_timeout;
            let writer = &mut self.writer;
            with_timeout(write_timeout, "writing reply", async {
                writer.write_all(&response).await?;
                writer.flush().await?;
                Ok::<(), AppError>(())
            })
            .await?;
        }
        debug!("connection {} closed by peer", connection_id);

        Ok(())
    }
}

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    limit_connections: Arc<Semaphore>,
    notify_shutdown: broadcast::Sender<()>,
    shutdown_complete_tx: mpsc::Sender<()>,
    registry: Arc<GameRegistry>,
    config: Arc<CoordinatorConfig>,
}

impl Server {
    pub fn new(
        listener: TcpListener,
        notify_shutdown: broadcast::Sender<()>,
        shutdown_complete_tx: mpsc::Sender<()>,
        registry: Arc<GameRegistry>,
        config: Arc<CoordinatorConfig>,
    ) -> Self {
        Server {
            listener,
            limit_connections: Arc::new(Semaphore::new(config.network.max_connection)),
            notify_shutdown,
            shutdown_complete_tx,
            registry,
            config,
        }
    }

    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until shutdown is signalled or accepting keeps failing.
    ///
    /// Each connection gets a permit from the connection limit, a unique id and
    /// its own `ConnectionHandler` task, which dispatches every decoded request
    /// against the shared registry before reading the next one.
    ///
    // Graceful shutdown sequence:
    // 1. The accept loop returns on the shutdown signal and the server is dropped.
    // 2. Each connection handler stops reading once it sees the signal; a request
    //    already in flight is answered first.
    // 3. The last dropped `shutdown_complete_tx` lets the coordinator finish.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> AppResult<()> {
        let network = &self.config.network;
        let mut shutdown = Shutdown::subscribe(&self.notify_shutdown);

        loop {
            let permit = tokio::select! {
                permit = self.limit_connections.clone().acquire_owned() => permit
                    .map_err(|e| AppError::IllegalStateError(format!("connection limit closed: {}", e)))?,
                _ = shutdown.recv() => break,
            };

            let socket = tokio::select! {
                socket = self.accept() => socket?,
                _ = shutdown.recv() => break,
            };

            let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
            let (reader, writer) = socket.into_split();
            let connection = Connection::new(
                reader,
                network.conn_read_buffer_size,
                FrameCodec::new(network.max_frame_size),
            );
            let context = RequestContext::new(
                connection_id,
                connection.client_ip.clone(),
                self.registry.clone(),
            );

            let mut handler = ConnectionHandler {
                shutdown: Shutdown::subscribe(&self.notify_shutdown),
                _shutdown_complete_tx: self.shutdown_complete_tx.clone(),
                connection,
                writer: BufWriter::new(writer),
                context,
                error_responses: network.error_responses,
                read_timeout: network.read_timeout(),
                write_timeout: network.write_timeout(),
            };
            // the handler only sees signals sent after it subscribed
            if shutdown.check() {
                break;
            }
            info!(
                connection_id,
                client = %handler.context.client_ip,
                "opened connection"
            );

            tokio::spawn(async move {
                match handler.handle_connection().await {
                    Ok(()) => {}
                    Err(err @ (AppError::Timeout(_) | AppError::ConnectionClosed(_))) => {
                        debug!(connection_id, "connection dropped: {}", err);
                    }
                    Err(err) => {
                        warn!(connection_id, kind = err.kind(), "connection error: {}", err);
                    }
                }
                info!(connection_id, "closed connection");
                // whether gracefully or unexpectedly closed, release connection
                drop(permit);
            });
        }
        debug!("accept loop stopped");
        Ok(())
    }

    async fn accept(&self) -> AppResult<TcpStream> {
        let mut backoff = 1;

        loop {
            match self.listener.accept().await {
                Ok((socket, _)) => return Ok(socket),
                Err(err) => {
                    if backoff > 64 {
                        return Err(AppError::IoError(err));
                    }
                    warn!("accept failed, retrying in {}s: {}", backoff, err);
                }
            }

            time::sleep(Duration::from_secs(backoff)).await;
            backoff *= 2;
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        debug!("tcp server dropped");
    }
}
