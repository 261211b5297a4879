//! Errors raised before any analysis starts.
//!
//! [`EvalError`] covers locating the tooleval home directory, reading and
//! checking the configuration file, and installing the tracing subscriber.
//! Analysis and generator failures have their own error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`EvalError`].
pub type Result<T> = std::result::Result<T, EvalError>;

/// Setup failure. All of them abort the command.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The configuration file could not be read
    #[error("cannot read configuration {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file does not deserialize
    #[error("invalid configuration {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// The configuration parsed but holds unusable values
    #[error("invalid configuration value: {message}")]
    ConfigValidation { message: String },

    #[error("home directory could not be determined")]
    NoHomeDir,

    /// The log directory could not be created
    #[error("cannot create log directory {path}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A global tracing subscriber is already installed
    #[error("logging setup failed: {0}")]
    LoggingInit(String),
}

impl EvalError {
    pub fn config_not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Whether the configuration file is at fault.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// A hint on how to fix the problem, if there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("pass --config with an existing file, or omit it to use defaults")
            }
            Self::ConfigInvalid { .. } => Some("check the YAML syntax and field names"),
            Self::NoHomeDir => Some("set HOME or pass --config explicitly"),
            Self::LogDirectory { .. } => Some("pass a writable --log-dir"),
            _ => None,
        }
    }
}
