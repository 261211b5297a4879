//! Error types for catalog and query generation.

use thiserror::Error;
use tooleval_analysis::AnalysisError;

/// Errors that can occur during generation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed docstring for {function}: cannot split {fragment:?} into name and description")]
    MalformedDocstring { function: String, fragment: String },

    #[error("Docstring of {function} describes unknown parameter {parameter}")]
    UnknownParameter { function: String, parameter: String },

    #[error("Parameter {parameter} of {function} has no description")]
    MissingDescription { function: String, parameter: String },

    #[error("Invalid task definition: {0}")]
    Task(#[from] AnalysisError),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
