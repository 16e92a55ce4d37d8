use dotenv::dotenv;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::{AppError, AppResult};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// `RUST_LOG` wins when set, otherwise `default_directive` applies.
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Maps a `-v` count to a filter directive.
pub fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Stdout-only subscriber. A second call is a no-op, so tests may call it freely.
pub fn setup_local_tracing() -> AppResult<()> {
    dotenv().ok();
    let timer = ChronoLocal::new(TIME_FORMAT.to_string());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer)
        .with_target(true)
        .with_thread_names(true)
        .with_thread_ids(true)
        .with_line_number(true);
    if tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter("debug"))
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

/// Holds the non-blocking file writer open; logs are flushed when dropped.
pub struct TracingGuard {
    _worker_guard: WorkerGuard,
}

/// Stdout plus an hourly-rolling file under `logs/`.
pub fn setup_tracing(default_directive: &str) -> AppResult<TracingGuard> {
    dotenv().ok();
    let file_appender = tracing_appender::rolling::hourly("logs", "game-coordinator.log");
    let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
    let writer = non_blocking.and(std::io::stdout);

    let timer = ChronoLocal::new(TIME_FORMAT.to_string());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer)
        .with_target(true)
        .with_thread_names(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(default_directive))
        .try_init()
        .map_err(|e| AppError::IllegalStateError(format!("install tracing subscriber: {e}")))?;

    Ok(TracingGuard {
        _worker_guard: worker_guard,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(7, "trace")]
    fn verbosity_maps_to_level(#[case] verbose: u8, #[case] expected: &str) {
        assert_eq!(verbosity_directive(verbose), expected);
    }

    #[test]
    fn local_tracing_is_idempotent() {
        setup_local_tracing().unwrap();
        setup_local_tracing().unwrap();
    }
}
