// src/logging.rs
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install the global subscriber. `RUST_LOG` wins over `level`.
///
/// When `log_file` is set, JSON lines also go to a daily rolling file in its
/// directory. Keep the returned guard alive or buffered lines are lost.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("failed to create log filter: {e}"))?;

    let registry = Registry::default().with(env_filter);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true);

    let guard = match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "school.log".to_string());
            let (writer, guard) = non_blocking(rolling::daily(dir, file_name));

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .json();

            registry
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| anyhow!("failed to install subscriber: {e}"))?;
            Some(guard)
        }
        None => {
            registry
                .with(console_layer)
                .try_init()
                .map_err(|e| anyhow!("failed to install subscriber: {e}"))?;
            None
        }
    };

    tracing::info!(level, "logging initialized");
    Ok(guard)
}
