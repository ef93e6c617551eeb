//! Structured JSONL logging for embedders.
//!
//! Dual-output: JSONL to a file for machine parsing, compact
//! human-readable output on stderr. The core itself only emits `tracing`
//! events; call `init()` from the host application (or a demo) once.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Guard that must be kept alive for the duration of the program.
/// Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize dual-output logging in the default log directory. Returns a
/// guard the caller must hold.
pub fn init() -> std::io::Result<LoggingGuard> {
    init_at(&log_dir())
}

/// Same as `init()` with an explicit log directory.
pub fn init_at(log_dir: &Path) -> std::io::Result<LoggingGuard> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join("shortcut-kit.jsonl");

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    tracing::info!(log_path = %log_path.display(), "shortcut-kit logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("shortcut-kit").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("shortcut-kit-logs"))
}

/// Path of the JSONL log file `init()` writes to.
pub fn log_path() -> PathBuf {
    log_dir().join("shortcut-kit.jsonl")
}
