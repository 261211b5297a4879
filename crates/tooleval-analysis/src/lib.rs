//! # tooleval-analysis
//!
//! Analysis of LLM tool-use benchmark runs.
//!
//! This crate provides:
//! - [`LogParser`] - Split an execution log into per-task [`Record`]s
//! - [`PriceTable`] - Token pricing used to cost each record
//! - [`validate`] - Completeness check against the task and query files
//! - [`assess`] - Correctness and difficulty level per record
//! - [`StatisticsReport`] - Count, accuracy and interquartile-mean cost per level
//!
//! ## Example
//!
//! ```no_run
//! use tooleval_analysis::{
//!     LogParser, PriceTable, StatisticsReport, assess, load_queries, load_tasks, validate,
//! };
//!
//! fn main() -> tooleval_analysis::Result<()> {
//!     let parser = LogParser::new("gpt-3.5-turbo-0125", PriceTable::defaults())?;
//!     let mut records = parser.parse_file("data/LOG.txt")?;
//!
//!     let tasks = load_tasks("math_tasks.json")?;
//!     let queries = load_queries("instruction/custom_query.json")?;
//!     validate(&records, &tasks, &queries)?;
//!
//!     assess(&mut records, &tasks)?;
//!     println!("{}", StatisticsReport::compute(&records)?);
//!     Ok(())
//! }
//! ```

pub mod assessor;
pub mod error;
pub mod models;
pub mod parser;
pub mod pricing;
pub mod stats;
pub mod validator;

// Re-export main types
pub use assessor::{assess, is_correct};
pub use error::{AnalysisError, Result};
pub use models::{
    ApiReference, Level, QueryEntry, Record, TaskDefinition, load_queries, load_tasks,
};
pub use parser::LogParser;
pub use pricing::{DEFAULT_MODEL, ModelPricing, PriceTable};
pub use stats::{LevelStats, StatisticsReport, interquartile_mean};
pub use validator::{ValidationReport, validate};
