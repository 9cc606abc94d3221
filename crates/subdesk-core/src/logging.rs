//! Logging infrastructure for subdesk.
//!
//! Structured logging on the `tracing` ecosystem. The terminal belongs to the
//! TUI while it runs, so everything goes to a JSON lines file under
//! `~/.subdesk/logs/` and nothing is written to the console.
//!
//! ## Example
//!
//! ```no_run
//! use subdesk_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("subdesk started");
//! tracing::debug!(endpoint = "/api/subscription", "fetching");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{Result, SubdeskError};

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "subdesk.log";

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Dropping it flushes pending entries, so keep it alive for the lifetime of
/// the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the subdesk logging system.
///
/// Sets up a daily rolling JSON lines file at `<log_dir>/subdesk.log`.
/// `RUST_LOG` overrides the default filter, which is `subdesk=info`
/// (`subdesk=debug` when `verbose`).
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.subdesk/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| SubdeskError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("subdesk={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true)
        .with_file(verbose)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| SubdeskError::internal(format!("failed to install subscriber: {e}")))?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Base directory for subdesk state: `~/.subdesk/`.
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| SubdeskError::Internal {
        message: "home directory could not be determined".into(),
    })?;

    Ok(home.join(".subdesk"))
}

/// Get the default log directory path.
///
/// Returns `~/.subdesk/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("logs"))
}
