//! Logging setup for hosts embedding the lookup engine.
//!
//! The library itself only emits `tracing` events. A host that has no
//! subscriber of its own can call [`init_logging`] to get:
//! - `logs/atlasquery.log`, cleared at start of session
//! - the same events on stdout
//! - filtering through `RUST_LOG` (default [`DEFAULT_FILTER`])

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,atlasquery=debug";

/// Keeps the file writer alive. Dropping it flushes and closes the log.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Creates `log_dir` and truncates `log_file` inside it.
pub fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// Installs the global subscriber behind an `EnvFilter`.
///
/// The file receives full events with span timings; stdout gets a compact
/// one-line form. Without `RUST_LOG`, this crate logs at `debug` and
/// everything else at `info`.
///
/// # Errors
///
/// Fails if the log file cannot be prepared or a global subscriber is
/// already installed.
pub fn init_logging(log_dir: &str, log_file: &str) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(Path::new(log_dir), log_file)?;

    let (writer, file_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_file));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stdout),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Default log directory.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "atlasquery.log"
}
