pub use app_error::{AppError, AppResult};
pub use self::config::{CoordinatorConfig, GeneralConfig, NetworkConfig};
pub use coordinator::{Coordinator, RunningCoordinator};
pub use server::Server;
pub use shutdown::Shutdown;
pub use tracing_config::{
    setup_local_tracing, setup_tracing, verbosity_directive, TracingGuard,
};

mod app_error;
mod config;
mod coordinator;
mod server;
mod shutdown;
mod tracing_config;
