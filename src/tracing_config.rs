use std::{env, io};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigPaths, GeneralConfig};

const FORMAT_VAR: &str = "MPRIS_SYNC_LOG_FORMAT";

fn env_filter(general: &GeneralConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(general.log_level.as_directive()))
}

fn json_requested() -> bool {
    env::var(FORMAT_VAR).is_ok_and(|format| format == "json")
}

/// Initialize tracing for the application
///
/// Uses RUST_LOG if set, otherwise the configured log level.
/// Output is pretty unless `MPRIS_SYNC_LOG_FORMAT=json`. Logs go to stderr
/// so stdout stays clean for command output.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init(general: &GeneralConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(env_filter(general));

    if json_requested() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

/// Initialize tracing with file output
///
/// Like [`init`], but also writes a daily-rotated log under the
/// application data directory.
///
/// # Errors
/// Returns error if the log directory or appender cannot be created, or a
/// global subscriber is already installed
pub fn init_with_file(general: &GeneralConfig) -> Result<(), Box<dyn std::error::Error>> {
    const DAYS_TO_KEEP: usize = 7;

    let log_dir = ConfigPaths::log_dir()?;
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("mpris-sync")
        .filename_suffix("log")
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry().with(env_filter(general));

    if json_requested() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    // The writer thread must outlive main.
    std::mem::forget(guard);

    Ok(())
}
