use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file directory: `<cache_dir>/ctfgh`
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ctfgh")
}

/// Install the file logger. The terminal belongs to the UI, so nothing is
/// written to stdout.
///
/// Filter comes from `CTFGH_LOG` (default `info`). Keep the returned guard
/// alive until exit or buffered lines are lost. `None` when the log
/// directory cannot be created.
pub fn init_logging() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&dir, "ctfgh.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false);

    let env_filter =
        EnvFilter::try_from_env("CTFGH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Some(guard)
}
