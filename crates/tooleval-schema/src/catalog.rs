//! Tool catalog generation.
//!
//! Turns a function manifest into the tool description format the benchmark
//! harness loads (one tool with a list of APIs), plus the list of
//! [`ApiReference`]s that queries attach to each task.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tooleval_analysis::ApiReference;
use tracing::{debug, info, warn};

use crate::error::{Result, SchemaError};
use crate::manifest::{FunctionSpec, parse_docstring};

/// JSON Schema types every harness accepts.
pub const SCALAR_TYPES: [&str; 4] = ["number", "integer", "string", "boolean"];

/// Catalog-level naming and feature switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    pub tool_name: String,
    pub title: String,
    pub tool_description: String,
    pub category_name: String,
    pub standardized_name: String,
    /// Accept `array` parameters (with their `items` schema)
    pub array_support: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            tool_name: "custom math".to_string(),
            title: "custom math".to_string(),
            tool_description: "Custom math functions.".to_string(),
            category_name: "Customized".to_string(),
            standardized_name: "custom_math".to_string(),
            array_support: true,
        }
    }
}

impl CatalogOptions {
    /// Whether a parameter type can be exposed.
    pub fn supports_type(&self, param_type: &str) -> bool {
        SCALAR_TYPES.contains(&param_type) || (self.array_support && param_type == "array")
    }

    /// Reference to an API of this tool.
    pub fn api_reference(&self, api_name: impl Into<String>) -> ApiReference {
        ApiReference {
            category_name: self.category_name.clone(),
            tool_name: self.tool_name.clone(),
            api_name: api_name.into(),
        }
    }
}

/// Parameter of an API entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
}

/// One API of the tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEntry {
    pub name: String,
    pub url: String,
    pub description: String,
    pub method: String,
    pub required_parameters: Vec<ApiParameter>,
    pub optional_parameters: Vec<ApiParameter>,
}

/// Tool description file consumed by the benchmark harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalog {
    pub tool_description: String,
    pub tool_name: String,
    pub title: String,
    pub api_list: Vec<ApiEntry>,
    pub standardized_name: String,
}

impl ToolCatalog {
    /// References to every API of the catalog.
    pub fn api_references(&self, category_name: &str) -> Vec<ApiReference> {
        self.api_list
            .iter()
            .map(|api| ApiReference {
                category_name: category_name.to_string(),
                tool_name: self.tool_name.clone(),
                api_name: api.name.clone(),
            })
            .collect()
    }
}

/// Catalog plus the API references derived from it.
#[derive(Debug, Clone)]
pub struct GeneratedCatalog {
    pub catalog: ToolCatalog,
    pub api_references: Vec<ApiReference>,
    /// Functions left out because of unsupported parameter types
    pub skipped: Vec<String>,
}

/// Build the tool catalog for `functions`.
///
/// Functions with a parameter whose type is unsupported (or missing) are
/// skipped with a warning; docstring problems are errors.
pub fn build_catalog(
    functions: &[FunctionSpec],
    options: &CatalogOptions,
) -> Result<GeneratedCatalog> {
    info!(count = functions.len(), "Building tool catalog");

    let mut seen = HashSet::new();
    for function in functions {
        if !seen.insert(function.name.as_str()) {
            warn!(function = %function.name, "Duplicate function name in manifest");
        }
    }

    let mut api_list = Vec::new();
    let mut api_references = Vec::new();
    let mut skipped = Vec::new();

    for function in functions {
        match describe_function(function, options)? {
            Some(entry) => {
                debug!(
                    function = %entry.name,
                    parameters = entry.required_parameters.len(),
                    "API described"
                );
                api_references.push(options.api_reference(&entry.name));
                api_list.push(entry);
            }
            None => skipped.push(function.name.clone()),
        }
    }

    info!(apis = api_list.len(), skipped = skipped.len(), "Tool catalog built");

    Ok(GeneratedCatalog {
        catalog: ToolCatalog {
            tool_description: options.tool_description.clone(),
            tool_name: options.tool_name.clone(),
            title: options.title.clone(),
            api_list,
            standardized_name: options.standardized_name.clone(),
        },
        api_references,
        skipped,
    })
}

/// Describe one function, or `None` if it cannot be exposed.
pub fn describe_function(
    function: &FunctionSpec,
    options: &CatalogOptions,
) -> Result<Option<ApiEntry>> {
    let docstring = parse_docstring(&function.name, &function.doc)?;

    for (parameter, _) in &docstring.parameters {
        if !function.parameters.properties.contains_key(parameter) {
            return Err(SchemaError::UnknownParameter {
                function: function.name.clone(),
                parameter: parameter.clone(),
            });
        }
    }

    let mut parameters = Vec::new();
    for (name, schema) in function.parameters.ordered_properties() {
        let Some(param_type) = schema.get("type").and_then(Value::as_str) else {
            warn!(
                function = %function.name,
                parameter = name,
                "Parameter has no simple type, skipping function"
            );
            return Ok(None);
        };
        if !options.supports_type(param_type) {
            warn!(
                function = %function.name,
                parameter = name,
                param_type,
                "Unsupported parameter type, skipping function"
            );
            return Ok(None);
        }

        let description = docstring
            .parameter(name)
            .or_else(|| schema.get("description").and_then(Value::as_str))
            .ok_or_else(|| SchemaError::MissingDescription {
                function: function.name.clone(),
                parameter: name.to_string(),
            })?;

        let items = if options.array_support {
            schema.get("items").cloned()
        } else {
            None
        };

        parameters.push(ApiParameter {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            default: None,
            items,
        });
    }

    Ok(Some(ApiEntry {
        name: function.name.clone(),
        url: String::new(),
        description: docstring.description,
        method: "GET".to_string(),
        required_parameters: parameters,
        optional_parameters: Vec::new(),
    }))
}

/// Load a previously written catalog.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ToolCatalog> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn function(name: &str, doc: &str, parameters: Value) -> FunctionSpec {
        FunctionSpec {
            name: name.to_string(),
            doc: doc.to_string(),
            parameters: serde_json::from_value(parameters).unwrap(),
        }
    }

    fn add() -> FunctionSpec {
        function(
            "add",
            "Add two numbers.\n\n:param a: First summand.\n:param b: Second summand.\n:return: The sum.",
            json!({
                "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                "required": ["a", "b"]
            }),
        )
    }

    fn mean() -> FunctionSpec {
        function(
            "mean",
            "Arithmetic mean.\n:param values: Numbers to average.",
            json!({
                "properties": {"values": {"type": "array", "items": {"type": "number"}}},
                "required": ["values"]
            }),
        )
    }

    #[test]
    fn test_describe_function() {
        let entry = describe_function(&add(), &CatalogOptions::default())
            .unwrap()
            .unwrap();

        assert_eq!(entry.name, "add");
        assert_eq!(entry.description, "Add two numbers.");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.required_parameters.len(), 2);
        assert_eq!(entry.required_parameters[0].name, "a");
        assert_eq!(entry.required_parameters[0].param_type, "number");
        assert_eq!(entry.required_parameters[1].description, "Second summand.");
        assert!(entry.optional_parameters.is_empty());
    }

    #[test]
    fn test_array_support_switch() {
        let with_arrays = CatalogOptions::default();
        let entry = describe_function(&mean(), &with_arrays).unwrap().unwrap();
        assert_eq!(entry.required_parameters[0].items, Some(json!({"type": "number"})));

        let without_arrays = CatalogOptions {
            array_support: false,
            ..CatalogOptions::default()
        };
        assert!(describe_function(&mean(), &without_arrays).unwrap().is_none());
    }

    #[test]
    fn test_untyped_parameter_skips_function() {
        let optional = function(
            "maybe",
            "Maybe.\n:param x: Possibly a number.",
            json!({"properties": {"x": {"anyOf": [{"type": "number"}, {"type": "null"}]}}}),
        );
        assert!(describe_function(&optional, &CatalogOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_schema_description_fallback() {
        let f = function(
            "neg",
            "Negate.",
            json!({"properties": {"x": {"type": "integer", "description": "Value."}}}),
        );
        let entry = describe_function(&f, &CatalogOptions::default()).unwrap().unwrap();
        assert_eq!(entry.required_parameters[0].description, "Value.");
    }

    #[test]
    fn test_missing_description_fails() {
        let f = function("neg", "Negate.", json!({"properties": {"x": {"type": "integer"}}}));
        let err = describe_function(&f, &CatalogOptions::default()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingDescription { .. }));
    }

    #[test]
    fn test_unknown_documented_parameter_fails() {
        let f = function("neg", "Negate.\n:param y: Nope.", json!({"properties": {}}));
        let err = describe_function(&f, &CatalogOptions::default()).unwrap_err();
        assert!(
            matches!(err, SchemaError::UnknownParameter { ref parameter, .. } if parameter == "y")
        );
    }

    #[test]
    fn test_build_catalog() {
        let options = CatalogOptions {
            array_support: false,
            ..CatalogOptions::default()
        };
        let generated = build_catalog(&[add(), mean()], &options).unwrap();

        assert_eq!(generated.catalog.api_list.len(), 1);
        assert_eq!(generated.skipped, vec!["mean".to_string()]);
        assert_eq!(generated.catalog.standardized_name, "custom_math");
        assert_eq!(
            generated.api_references,
            vec![ApiReference {
                category_name: "Customized".to_string(),
                tool_name: "custom math".to_string(),
                api_name: "add".to_string(),
            }]
        );
        assert_eq!(
            generated.catalog.api_references("Customized"),
            generated.api_references
        );
    }

    #[test]
    fn test_catalog_json_shape() {
        let generated = build_catalog(&[add()], &CatalogOptions::default()).unwrap();
        let value = serde_json::to_value(&generated.catalog).unwrap();

        let param = &value["api_list"][0]["required_parameters"][0];
        assert_eq!(param["type"], "number");
        assert!(param["default"].is_null());
        assert!(param.get("items").is_none());
        assert_eq!(value["api_list"][0]["url"], "");
    }
}
