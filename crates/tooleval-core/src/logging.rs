//! Tracing setup for the tooleval binary.
//!
//! Diagnostics always go to stderr, leaving stdout to the reports. Passing a
//! log directory adds a daily rolling JSON file next to the console output.
//!
//! ```no_run
//! let _guard = tooleval_core::init_logging(None, false)?;
//! tracing::info!(records = 12, "log parsed");
//! # Ok::<(), tooleval_core::EvalError>(())
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;

use crate::error::{EvalError, Result};

/// Base name of the JSON log files; the appender adds a date suffix.
pub const LOG_FILE_NAME: &str = "tooleval.log";

/// Flushes the file log when dropped. Hold it until the process exits.
pub struct LogGuard {
    file_guard: Option<WorkerGuard>,
}

impl LogGuard {
    pub fn has_file_log(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `tooleval=info`
/// (`tooleval=debug` with `verbose`).
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "tooleval=debug"
        } else {
            "tooleval=info"
        })
    });

    let stderr_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose);

    let mut file_guard = None;
    let json_layer = match log_dir.as_deref() {
        Some(dir) => {
            let (writer, guard) = json_writer(dir)?;
            file_guard = Some(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| EvalError::LoggingInit(e.to_string()))?;

    tracing::debug!(?log_dir, verbose, "tracing ready");
    Ok(LogGuard { file_guard })
}

fn json_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir).map_err(|source| EvalError::LogDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::daily(dir, LOG_FILE_NAME),
    ))
}

/// Route tracing output through the test harness. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("tooleval=debug"))
        .try_init();
}

/// `~/.tooleval`, holding the default configuration file.
pub fn default_home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".tooleval"))
        .ok_or(EvalError::NoHomeDir)
}
