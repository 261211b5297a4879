//! # tooleval-config
//!
//! Configuration for the tooleval command-line tool.
//!
//! Configuration is an optional YAML file, `~/.tooleval/config.yaml` unless
//! `--config` names another one. Every field has a default, so a partial
//! file only overrides what it mentions:
//!
//! ```yaml
//! model: gpt-4o-mini-2024-07-18
//! paths:
//!   log: data/LOG.txt
//!   tasks: math_tasks.json
//! prices:
//!   my-finetune:
//!     input_per_million: 3.0
//!     output_per_million: 6.0
//! catalog:
//!   array_support: false
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tooleval_analysis::{DEFAULT_MODEL, ModelPricing, PriceTable};
use tooleval_core::{EvalError, Result};
use tooleval_schema::CatalogOptions;
use tracing::{debug, info};

/// File name of the configuration inside the tooleval home directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Model whose prices cost the log records
    pub model: String,

    /// Input and output file locations
    pub paths: PathsConfig,

    /// Extra or overriding price table entries
    pub prices: BTreeMap<String, ModelPricing>,

    /// Tool catalog naming and options
    pub catalog: CatalogOptions,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            paths: PathsConfig::default(),
            prices: BTreeMap::new(),
            catalog: CatalogOptions::default(),
        }
    }
}

/// File locations, relative to the working directory unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Execution log of the benchmark run
    pub log: PathBuf,
    /// Task definitions with valid solutions
    pub tasks: PathBuf,
    /// Query file given to the harness
    pub queries: PathBuf,
    /// Function manifest for catalog generation
    pub manifest: PathBuf,
    /// Generated tool catalog
    pub catalog: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log: PathBuf::from("data/LOG.txt"),
            tasks: PathBuf::from("math_tasks.json"),
            queries: PathBuf::from("instruction/custom_query.json"),
            manifest: PathBuf::from("api_manifest.json"),
            catalog: PathBuf::from("custom_math.json"),
        }
    }
}

impl EvalConfig {
    /// Default configuration file location (`~/.tooleval/config.yaml`).
    pub fn default_path() -> Result<PathBuf> {
        Ok(tooleval_core::logging::default_home_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EvalError::config_not_found(path, e))?;

        let config = Self::from_yaml(&content).map_err(|message| EvalError::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;

        info!(path = %path.display(), model = %config.model, "Configuration loaded");
        Ok(config)
    }

    /// Load `explicit` if given, else the default file if it exists, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Ok(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        // An empty file is an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(EvalError::validation("model must not be empty"));
        }

        for (model, pricing) in &self.prices {
            if pricing.input_per_million < 0.0 || pricing.output_per_million < 0.0 {
                return Err(EvalError::validation(format!(
                    "negative price for model {model}"
                )));
            }
        }

        Ok(())
    }

    /// Default prices merged with the configured entries.
    pub fn price_table(&self) -> PriceTable {
        PriceTable::defaults().extend(self.prices.clone())
    }
}
