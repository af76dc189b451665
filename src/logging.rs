//! Audit logging.
//!
//! One append-only file of timestamped lifecycle/status/error lines (never
//! read back), plus human-readable output on stderr. The file writer is
//! non-blocking so a slow disk never stalls the pipeline worker.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns a guard that must be held for the lifetime of the process so
/// buffered lines reach the file. When the log file cannot be opened (e.g.
/// listing devices unprivileged while the default path is under /var/log),
/// logging falls back to stderr only and `None` is returned.
pub fn init(log_file: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .compact(),
                )
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .without_time(),
                )
                .try_init()
                .ok();
            Some(guard)
        }
        Err(err) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .without_time(),
                )
                .try_init()
                .ok();
            tracing::warn!(
                path = %log_file.display(),
                error = %err,
                "audit log unavailable, logging to stderr only"
            );
            None
        }
    }
}
