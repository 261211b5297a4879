//! Function manifests and docstring parsing.
//!
//! A manifest is a JSON array describing the callables to expose as tools:
//!
//! ```json
//! [
//!   {
//!     "name": "add",
//!     "doc": "Add two numbers.\n\n:param a: First summand.\n:param b: Second summand.\n:return: The sum.",
//!     "parameters": {
//!       "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
//!       "required": ["a", "b"]
//!     }
//!   }
//! ]
//! ```
//!
//! Docstrings use the reST field style: a free-text description followed by
//! `:param <name>: <description>` entries and an optional `:return:` entry.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

const PARAM_FIELD: &str = ":param ";
const RETURN_FIELD: &str = ":return:";

/// One callable of the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,

    #[serde(default)]
    pub doc: String,

    #[serde(default)]
    pub parameters: ParameterSchema,
}

/// JSON Schema object describing a function's parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Required parameter names
    #[serde(default)]
    pub required: Vec<String>,
}

impl ParameterSchema {
    /// Properties in manifest declaration order.
    pub fn ordered_properties(&self) -> Vec<(&str, &Value)> {
        self.properties
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
            .collect()
    }
}

/// Parsed docstring of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Docstring {
    pub description: String,
    /// `(parameter, description)` in docstring order
    pub parameters: Vec<(String, String)>,
}

impl Docstring {
    /// Description of a parameter, if documented.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, description)| description.as_str())
    }
}

/// Split a docstring into the function description and parameter entries.
pub fn parse_docstring(function: &str, doc: &str) -> Result<Docstring> {
    let mut pieces = doc.split(PARAM_FIELD).map(str::trim);

    let head = pieces.next().unwrap_or_default();
    let description = strip_return(head).to_string();

    let mut parameters = Vec::new();
    for piece in pieces.filter(|p| !p.is_empty()) {
        let body = strip_return(piece);
        let (name, text) = body
            .split_once(": ")
            .ok_or_else(|| SchemaError::MalformedDocstring {
                function: function.to_string(),
                fragment: body.to_string(),
            })?;
        parameters.push((name.trim().to_string(), text.trim().to_string()));
    }

    Ok(Docstring {
        description,
        parameters,
    })
}

fn strip_return(text: &str) -> &str {
    text.split(RETURN_FIELD).next().unwrap_or(text).trim()
}

/// Load a function manifest.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<FunctionSpec>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
