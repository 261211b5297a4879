//! Error types for the analysis pipeline.

use thiserror::Error;

use crate::models::Level;

/// Analysis errors. Every variant aborts the run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// IO error (file reading)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (task and query files)
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Log line that does not fit the expected trace format
    #[error("malformed log at line {line}: {message}")]
    MalformedLog {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Non-empty log without a single task-start marker
    #[error("log contains no task-start marker")]
    NoTasks,

    /// `Action Input` payload that is not valid JSON
    #[error("invalid action input at line {line}: {source}")]
    InvalidActionInput {
        /// 1-based line number
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Model identifier missing from the price table
    #[error("no pricing for model: {0}")]
    UnknownModel(String),

    /// Record whose task is not in the task definitions
    #[error("task not found in task definitions: {0}")]
    UnknownTask(String),

    /// Task name that does not follow the `<prefix>.<level>.<number>` shape
    #[error("invalid task name {name:?}: {reason}")]
    InvalidTaskName {
        /// The offending task name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Expected and actual counts disagree
    #[error("{what} count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        /// What was counted
        what: &'static str,
        /// Expected count (number of task definitions)
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// Statistics requested for a level with no records
    #[error("no records for level {0}")]
    EmptyCohort(Level),
}

impl AnalysisError {
    /// Create a malformed-log error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLog {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-task-name error.
    pub fn invalid_task_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTaskName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from the log file contents.
    pub fn is_log_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedLog { .. } | Self::NoTasks | Self::InvalidActionInput { .. }
        )
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
