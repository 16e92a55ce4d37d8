use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::{runtime, signal};
use tracing::{error, info, trace};

use crate::game::GameRegistry;
use crate::service::{CoordinatorConfig, Server};
use crate::{AppError, AppResult};

/// Owns the service lifecycle: the registry is created when the service starts
/// and dropped with it.
pub struct Coordinator {
    config: Arc<CoordinatorConfig>,
}

impl Coordinator {
    pub fn new(config: Arc<CoordinatorConfig>) -> Self {
        Coordinator { config }
    }

    /// Builds the runtime and serves until ctrl-c or a fatal accept error.
    pub fn start(&self) -> AppResult<()> {
        let rt = runtime::Builder::new_multi_thread()
            .worker_threads(self.config.general.worker_threads())
            .thread_name("game-coordinator")
            .enable_all()
            .build()?;

        rt.block_on(async {
            let mut running = self.spawn().await?;
            tokio::select! {
                res = &mut running.server_task => {
                    match res {
                        Ok(Err(err)) => error!(cause = %err, "failed to accept"),
                        Err(err) => error!(cause = %err, "accept loop aborted"),
                        Ok(Ok(())) => {}
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("get shutdown signal");
                }
            }
            running.shutdown().await
        })
    }

    /// Binds the listener and spawns the accept loop on the current runtime.
    pub async fn spawn(&self) -> AppResult<RunningCoordinator> {
        let (notify_shutdown, _) = broadcast::channel(1);
        let (shutdown_complete_tx, shutdown_complete_rx) = mpsc::channel(1);

        let listen_address = self.config.network.listen_address();
        let listener = TcpListener::bind(&listen_address).await.map_err(|err| {
            let error_msg = format!(
                "Failed to bind server to address: {} - Error: {}",
                listen_address, err
            );
            error!(error_msg);
            AppError::IllegalStateError(error_msg)
        })?;

        let registry = Arc::new(GameRegistry::new());
        let server = Server::new(
            listener,
            notify_shutdown.clone(),
            shutdown_complete_tx,
            registry.clone(),
            self.config.clone(),
        );
        let local_addr = server.local_addr()?;
        info!("tcp server binding to {} for listening", local_addr);

        let server_task = tokio::spawn(async move { server.run().await });

        Ok(RunningCoordinator {
            local_addr,
            registry,
            notify_shutdown,
            shutdown_complete_rx,
            server_task,
        })
    }
}

/// A service accepting connections in the background.
pub struct RunningCoordinator {
    local_addr: SocketAddr,
    registry: Arc<GameRegistry>,
    notify_shutdown: broadcast::Sender<()>,
    shutdown_complete_rx: mpsc::Receiver<()>,
    server_task: JoinHandle<AppResult<()>>,
}

impl RunningCoordinator {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> &Arc<GameRegistry> {
        &self.registry
    }

    /// Signals shutdown and waits until the accept loop and every connection
    /// handler are gone. The registry and its games are discarded.
    pub async fn shutdown(mut self) -> AppResult<()> {
        // an error only means nobody is listening anymore
        let _ = self.notify_shutdown.send(());
        if !self.server_task.is_finished() {
            match (&mut self.server_task).await {
                Ok(res) => res?,
                Err(err) => {
                    return Err(AppError::IllegalStateError(format!(
                        "accept loop task failed: {}",
                        err
                    )))
                }
            }
        }
        trace!("waiting for shutdown complete...");
        // resolves with None once every shutdown_complete_tx is dropped
        self.shutdown_complete_rx.recv().await;
        info!("coordinator shutdown complete");
        Ok(())
    }
}
