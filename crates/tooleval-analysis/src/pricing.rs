//! Per-model token pricing.
//!
//! The price table is plain configuration: it is built once (from
//! [`PriceTable::defaults`] plus any configured overrides) and passed to the
//! log parser. Lookups are exact; there is no fallback price.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Decimal places kept in record costs.
pub const COST_DECIMALS: usize = 5;

/// Model priced by default.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0125";

/// Model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    #[serde(default)]
    pub output_per_million: f64,
}

impl ModelPricing {
    pub fn new(input: f64, output: f64) -> Self {
        Self {
            input_per_million: input,
            output_per_million: output,
        }
    }

    /// Pricing for embedding models, which only bill input tokens.
    pub fn input_only(input: f64) -> Self {
        Self::new(input, 0.0)
    }

    /// Calculate cost from token counts, rounded to [`COST_DECIMALS`].
    pub fn cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        let raw = self.input_per_million / 1_000_000.0 * prompt_tokens as f64
            + self.output_per_million / 1_000_000.0 * completion_tokens as f64;
        round_to(raw, COST_DECIMALS)
    }
}

/// Round to a fixed number of decimal places.
///
/// Rounds the exact binary value, half to even, so `0.000225` (stored just
/// below) becomes `0.00022`. Scaling by a power of ten first would round the
/// product instead.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Immutable mapping from model identifier to pricing.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    models: HashMap<String, ModelPricing>,
}

impl PriceTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// OpenAI prices the benchmark runs were billed at.
    pub fn defaults() -> Self {
        Self::new()
            .with_model("gpt-3.5-turbo-0125", ModelPricing::new(0.5, 1.5))
            .with_model("gpt-4-turbo-2024-04-09", ModelPricing::new(10.0, 30.0))
            .with_model("gpt-4o-2024-05-13", ModelPricing::new(5.0, 15.0))
            .with_model("gpt-4o-mini-2024-07-18", ModelPricing::new(0.15, 0.60))
            .with_model("text-embedding-ada-002", ModelPricing::input_only(0.10))
            .with_model("text-embedding-3-small", ModelPricing::input_only(0.02))
            .with_model("text-embedding-3-large", ModelPricing::input_only(0.13))
    }

    /// Add or replace pricing for a model.
    pub fn with_model(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.models.insert(model.into(), pricing);
        self
    }

    /// Merge entries from another table, replacing existing models.
    pub fn extend(mut self, overrides: impl IntoIterator<Item = (String, ModelPricing)>) -> Self {
        self.models.extend(overrides);
        self
    }

    /// Look up pricing for a model.
    pub fn get(&self, model: &str) -> Result<&ModelPricing> {
        self.models
            .get(model)
            .ok_or_else(|| AnalysisError::UnknownModel(model.to_string()))
    }

    /// Cost of a token usage under `model`.
    pub fn cost(&self, model: &str, prompt_tokens: u64, completion_tokens: u64) -> Result<f64> {
        Ok(self.get(model)?.cost(prompt_tokens, completion_tokens))
    }

    /// Known model identifiers, sorted.
    pub fn models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_cost() {
        let table = PriceTable::defaults();

        // $0.5/$1.5 per million
        let cost = table.cost(DEFAULT_MODEL, 1000, 200).unwrap();
        assert!((cost - 0.0008).abs() < 1e-12);

        let cost = table.cost("gpt-4o-2024-05-13", 1_000_000, 1_000_000).unwrap();
        assert!((cost - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_rounded_to_five_places() {
        let pricing = ModelPricing::new(0.15, 0.60);
        // 0.15e-6 * 123 + 0.6e-6 * 45 = 0.00004545
        let cost = pricing.cost(123, 45);
        assert!((cost - 0.00005).abs() < 1e-12);
    }

    #[test]
    fn test_cost_rounds_exact_binary_value() {
        // 1.5e-6 * 150 is stored as 0.000224999..., so it rounds down
        let cost = ModelPricing::new(0.5, 1.5).cost(0, 150);
        assert_eq!(cost, 0.00022);

        let cost = PriceTable::defaults().cost(DEFAULT_MODEL, 0, 150).unwrap();
        assert_eq!(cost, 0.00022);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 5), 0.12346);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.0, 5), 0.0);
    }

    #[test]
    fn test_cost_is_deterministic() {
        let table = PriceTable::defaults();
        let a = table.cost("gpt-4-turbo-2024-04-09", 4321, 987).unwrap();
        let b = table.cost("gpt-4-turbo-2024-04-09", 4321, 987).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_unknown_model_fails() {
        let table = PriceTable::defaults();
        let err = table.cost("claude-sonnet", 1, 1).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownModel(ref m) if m == "claude-sonnet"));
    }

    #[test]
    fn test_embedding_models_ignore_completion_tokens() {
        let table = PriceTable::defaults();
        let cost = table.cost("text-embedding-3-large", 1_000_000, 1_000_000).unwrap();
        assert!((cost - 0.13).abs() < 1e-9);
    }

    #[test]
    fn test_substitute_table() {
        let table = PriceTable::new().with_model("local", ModelPricing::new(1.0, 2.0));
        assert_eq!(table.models(), vec!["local"]);
        assert!(table.get(DEFAULT_MODEL).is_err());

        let table = table.extend([("local".to_string(), ModelPricing::new(3.0, 3.0))]);
        let cost = table.cost("local", 1_000_000, 0).unwrap();
        assert!((cost - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_models_sorted() {
        let table = PriceTable::defaults();
        let models = table.models();
        assert_eq!(models.len(), 7);
        assert_eq!(models[0], "gpt-3.5-turbo-0125");
    }
}
