//! Rendering of command results.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tooleval_analysis::{Record, StatisticsReport, ValidationReport};

/// Everything `analyze` produced.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub model: String,
    pub validation: ValidationReport,
    pub statistics: StatisticsReport,
    pub records: Vec<Record>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.model)?;
        writeln!(
            f,
            "Tasks: {}, queries: {}, results: {}",
            self.validation.expected_tasks, self.validation.queries, self.validation.records
        )?;
        for task in &self.validation.missing {
            writeln!(f, "Missing result: {task}")?;
        }
        write!(f, "{}", self.statistics)
    }
}

/// Files written by the generators.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub catalog: Option<PathBuf>,
    pub apis: usize,
    pub skipped: Vec<String>,
    pub queries: Option<PathBuf>,
    pub query_count: usize,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.catalog {
            writeln!(f, "Wrote {} APIs to {}", self.apis, path.display())?;
            if !self.skipped.is_empty() {
                writeln!(f, "Skipped: {}", self.skipped.join(", "))?;
            }
        }
        if let Some(path) = &self.queries {
            writeln!(
                f,
                "Wrote {} queries ({} APIs each) to {}",
                self.query_count,
                self.apis,
                path.display()
            )?;
        }
        Ok(())
    }
}
