//! Centralized file-based logging system
//!
//! Writes logs to files under the configured directory, separated by type:
//! - main/ - All logs, JSON
//! - error/ - Warnings and errors only
//! - api/ - HTTP server logs
//! - storage/ - Database logs
//! - quotes/ - Quote proxy logs

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::infrastructure::config::LoggingConfig;

const LOG_TYPES: [&str; 5] = ["main", "error", "api", "storage", "quotes"];

/// Initialize centralized file logging
///
/// Returns the WorkerGuards, which must be kept alive for the duration of the
/// program or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> io::Result<Vec<WorkerGuard>> {
    create_log_dirs(&config.directory)?;

    let mut guards = Vec::new();

    let (main_appender, main_guard) = create_appender(&config.directory, "main");
    guards.push(main_guard);

    let (error_appender, error_guard) = create_appender(&config.directory, "error");
    guards.push(error_guard);

    let (api_appender, api_guard) = create_appender(&config.directory, "api");
    guards.push(api_guard);

    let (storage_appender, storage_guard) = create_appender(&config.directory, "storage");
    guards.push(storage_guard);

    let (quotes_appender, quotes_guard) = create_appender(&config.directory, "quotes");
    guards.push(quotes_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let api_layer = tracing_subscriber::fmt::layer()
        .with_writer(api_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target().contains("api") || metadata.target().contains("tower_http")
        }));

    let storage_layer = tracing_subscriber::fmt::layer()
        .with_writer(storage_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target().contains("storage")
        }));

    let quotes_layer = tracing_subscriber::fmt::layer()
        .with_writer(quotes_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target().contains("quotes") || metadata.target().contains("reqwest")
        }));

    // Console layer for development
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(main_layer)
        .with(error_layer)
        .with(api_layer)
        .with(storage_layer)
        .with(quotes_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    tracing::info!(
        "Logging system initialized. Log files in {}",
        config.directory.display()
    );

    Ok(guards)
}

/// Create the log root and one subdirectory per log type
fn create_log_dirs(root: &Path) -> io::Result<()> {
    for log_type in LOG_TYPES {
        fs::create_dir_all(root.join(log_type))?;
    }
    Ok(())
}

/// Create a daily rolling file appender
fn create_appender(root: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, root.join(name), name);

    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_api {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "api", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_storage {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "storage", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_quotes {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "quotes", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_main {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "main", $level, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_creation() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("logs");

        create_log_dirs(&root).unwrap();

        for log_type in LOG_TYPES {
            assert!(root.join(log_type).is_dir());
        }
        // Idempotent on restart
        create_log_dirs(&root).unwrap();
    }
}
