//! # tooleval-schema
//!
//! Generation of benchmark inputs for custom tools.
//!
//! This crate provides:
//! - [`build_catalog`] - Tool catalog and API references from a function manifest
//! - [`build_queries`] - Query file entries for a task file
//! - [`write_json`] - Pretty JSON output in the layout the harness expects
//!
//! ## Example
//!
//! ```no_run
//! use tooleval_schema::{CatalogOptions, build_catalog, build_queries, load_manifest, write_json};
//!
//! fn main() -> tooleval_schema::Result<()> {
//!     let functions = load_manifest("api_manifest.json")?;
//!     let generated = build_catalog(&functions, &CatalogOptions::default())?;
//!     write_json("custom_math.json", &generated.catalog)?;
//!
//!     let tasks = tooleval_analysis::load_tasks("math_tasks.json")?;
//!     let queries = build_queries(&tasks, &generated.api_references)?;
//!     write_json("instruction/custom_query.json", &queries)?;
//!     Ok(())
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod queries;

// Re-export main types
pub use catalog::{
    ApiEntry, ApiParameter, CatalogOptions, GeneratedCatalog, ToolCatalog, build_catalog,
    describe_function, load_catalog,
};
pub use error::{Result, SchemaError};
pub use manifest::{Docstring, FunctionSpec, ParameterSchema, load_manifest, parse_docstring};
pub use queries::{build_queries, query_id};

/// Indentation of generated JSON files.
const JSON_INDENT: &[u8] = b"    ";

/// Serialize `value` as pretty JSON with four-space indentation.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write `value` to `path` as pretty JSON, creating parent directories.
pub fn write_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = to_json_string(value)?;
    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "JSON written");
    Ok(())
}
