//! # tooleval-core
//!
//! Setup errors and logging shared by the tooleval crates.
//!
//! - [`EvalError`] - configuration and logging setup failures
//! - [`logging`] - tracing subscriber for the command-line tool

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{EvalError, Result};
pub use logging::{LogGuard, init_logging};
