//! Data models for benchmark analysis.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalysisError, Result};
use crate::pricing::ModelPricing;

/// Difficulty level of a benchmark task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "E")]
    Easy,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    Hard,
}

impl Level {
    /// All levels in reporting order.
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    /// Parse the single-letter tag used in task names.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "E" => Some(Self::Easy),
            "M" => Some(Self::Medium),
            "H" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Single-letter tag (`E`, `M`, `H`).
    pub fn tag(self) -> char {
        match self {
            Self::Easy => 'E',
            Self::Medium => 'M',
            Self::Hard => 'H',
        }
    }

    /// Leading digit of query ids for tasks of this level.
    pub fn query_digit(self) -> char {
        match self {
            Self::Easy => '1',
            Self::Medium => '2',
            Self::Hard => '3',
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parsed result for one task of an execution log.
///
/// Token counts are summed over every LLM call of the task. The cost is
/// fixed at construction; correctness and level are filled in by
/// [`crate::assessor::assess`].
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Task text as announced by the log
    pub name: String,

    /// Final answer extracted from the log (may be empty)
    pub response: String,

    /// Prompt tokens over all calls of the task
    pub prompt_tokens: u64,

    /// Completion tokens over all calls of the task
    pub completion_tokens: u64,

    cost: f64,
    correct: bool,
    level: Option<Level>,
}

impl Record {
    /// Create a record, pricing its token usage.
    pub fn new(
        name: impl Into<String>,
        response: impl Into<String>,
        prompt_tokens: u64,
        completion_tokens: u64,
        pricing: &ModelPricing,
    ) -> Self {
        Self {
            name: name.into(),
            response: response.into(),
            prompt_tokens,
            completion_tokens,
            cost: pricing.cost(prompt_tokens, completion_tokens),
            correct: false,
            level: None,
        }
    }

    /// Cost of the task, rounded to 5 decimal places.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether the response matched a valid solution.
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Difficulty level, once assessed.
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    /// Record the outcome of an assessment pass.
    pub fn set_assessment(&mut self, correct: bool, level: Level) {
        self.correct = correct;
        self.level = Some(level);
    }
}

/// Ground-truth entry of the task file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Task text, also the key the log uses to announce the task
    pub task: String,

    /// Dotted identifier such as `custom.1.E.3`
    pub name: String,

    /// Accepted answers
    #[serde(default)]
    pub valid_solutions: Vec<Value>,
}

impl TaskDefinition {
    /// Difficulty level, taken from the second-to-last segment of the name.
    pub fn level(&self) -> Result<Level> {
        let (tag, _) = self.name_tail()?;
        Level::from_tag(tag).ok_or_else(|| {
            AnalysisError::invalid_task_name(
                &self.name,
                format!("level segment {tag:?} is not one of E, M, H"),
            )
        })
    }

    /// Task number, the last segment of the name.
    pub fn number(&self) -> Result<&str> {
        let (_, number) = self.name_tail()?;
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(AnalysisError::invalid_task_name(
                &self.name,
                format!("number segment {number:?} is not numeric"),
            ));
        }
        Ok(number)
    }

    fn name_tail(&self) -> Result<(&str, &str)> {
        let mut segments = self.name.rsplit('.');
        match (segments.next(), segments.next()) {
            (Some(number), Some(level)) => Ok((level, number)),
            _ => Err(AnalysisError::invalid_task_name(
                &self.name,
                "expected at least `<level>.<number>`",
            )),
        }
    }
}

/// Reference to one API of the tool catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReference {
    pub category_name: String,
    pub tool_name: String,
    pub api_name: String,
}

/// Entry of the query (instruction) file fed to the benchmark harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEntry {
    pub query: String,
    pub query_id: u64,
    pub api_list: Vec<ApiReference>,
}

/// Load the task file (JSON array of [`TaskDefinition`]).
pub fn load_tasks<P: AsRef<Path>>(path: P) -> Result<Vec<TaskDefinition>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load the query file (JSON array of [`QueryEntry`]).
pub fn load_queries<P: AsRef<Path>>(path: P) -> Result<Vec<QueryEntry>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
