//! Parser for benchmark execution logs.
//!
//! The harness writes one free-text trace for a whole benchmark run. A task
//! block starts with a line such as
//!
//! ```text
//! [process(0)]now playing What is 2 + 3?, with 4 APIs
//! ```
//!
//! and runs until the next such line. Inside a block the parser sums the
//! token reports (`prompt tokens: 812, completion tokens: 64`, one per LLM
//! call) and keeps the last `Action Input: {...}` payload carrying a
//! `return_type`, whose `final_answer` is the task's response.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::error::{AnalysisError, Result};
use crate::models::Record;
use crate::pricing::{DEFAULT_MODEL, PriceTable};

/// Marks the start of a task block; the task text follows it.
pub const TASK_START_MARKER: &str = ")]now playing ";

/// Ends the task text on a task-start line.
pub const TASK_NAME_TERMINATOR: &str = ", with ";

/// Identifies a token usage report.
pub const TOKEN_REPORT_MARKER: &str = "prompt tokens";

/// Prefix of tool-call argument lines.
pub const ACTION_INPUT_PREFIX: &str = "Action Input: ";

/// How a single log line is interpreted.
#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    /// Start of a new task; carries the text after the marker
    TaskStart(&'a str),
    TokenReport,
    /// Tool-call arguments; carries the JSON payload
    ActionInput(&'a str),
    Other,
}

impl<'a> LineKind<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some((_, rest)) = line.rsplit_once(TASK_START_MARKER) {
            Self::TaskStart(rest)
        } else if line.contains(TOKEN_REPORT_MARKER) {
            Self::TokenReport
        } else if let Some(payload) = line.strip_prefix(ACTION_INPUT_PREFIX) {
            Self::ActionInput(payload.trim())
        } else {
            Self::Other
        }
    }
}

/// Task block being accumulated.
#[derive(Debug)]
struct OpenTask {
    name: String,
    response: String,
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl OpenTask {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: String::new(),
            prompt_tokens: 0,
            completion_tokens: 0,
        }
    }

    /// Add one token report; `None` if a running total would overflow.
    fn add_tokens(&mut self, prompt: u64, completion: u64) -> Option<()> {
        self.prompt_tokens = self.prompt_tokens.checked_add(prompt)?;
        self.completion_tokens = self.completion_tokens.checked_add(completion)?;
        Some(())
    }
}

/// Log parser turning an execution trace into per-task [`Record`]s.
#[derive(Debug, Clone)]
pub struct LogParser {
    model: String,
    prices: PriceTable,
}

impl LogParser {
    /// Create a parser pricing records as `model` from `prices`.
    ///
    /// Fails if the table has no entry for the model.
    pub fn new(model: impl Into<String>, prices: PriceTable) -> Result<Self> {
        let model = model.into();
        if let Err(e) = prices.get(&model) {
            warn!(model = %model, known = ?prices.models(), "Model has no price entry");
            return Err(e);
        }
        Ok(Self { model, prices })
    }

    /// Model used to price records.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Parse a log file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let records = self.parse_reader(BufReader::new(file))?;

        info!(file = %path.display(), count = records.len(), "Parsed log file");
        Ok(records)
    }

    /// Parse log text held in memory.
    pub fn parse_str(&self, text: &str) -> Result<Vec<Record>> {
        self.parse_reader(text.as_bytes())
    }

    /// Parse a log from any buffered reader.
    ///
    /// Records come out in file order, one per task-start line. An empty
    /// input yields no records; any other input without a task-start line
    /// is rejected.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut current: Option<OpenTask> = None;
        let mut saw_input = false;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            saw_input = true;

            match LineKind::classify(&line) {
                LineKind::TaskStart(rest) => {
                    if let Some(task) = current.take() {
                        records.push(self.finish(task)?);
                    }

                    let name = task_name(rest);
                    if name.is_empty() {
                        return Err(AnalysisError::malformed(
                            line_number,
                            "task-start line without task text",
                        ));
                    }

                    trace!(line = line_number, task = name, "Task started");
                    current = Some(OpenTask::new(name));
                }
                LineKind::TokenReport => {
                    let (prompt, completion) = parse_token_report(&line, line_number)?;
                    let task = current.as_mut().ok_or_else(|| {
                        AnalysisError::malformed(line_number, "token report before first task")
                    })?;
                    task.add_tokens(prompt, completion).ok_or_else(|| {
                        AnalysisError::malformed(line_number, "token total overflows")
                    })?;
                }
                LineKind::ActionInput(payload) => {
                    if let Some(response) = parse_action_input(payload, line_number)? {
                        let task = current.as_mut().ok_or_else(|| {
                            AnalysisError::malformed(line_number, "final answer before first task")
                        })?;
                        task.response = response;
                    }
                }
                LineKind::Other => {}
            }
        }

        match current {
            Some(task) => records.push(self.finish(task)?),
            None if saw_input => return Err(AnalysisError::NoTasks),
            None => {}
        }

        Ok(records)
    }

    fn finish(&self, task: OpenTask) -> Result<Record> {
        let pricing = self.prices.get(&self.model)?;
        let record = Record::new(
            task.name,
            task.response,
            task.prompt_tokens,
            task.completion_tokens,
            pricing,
        );

        debug!(
            task = %record.name,
            prompt_tokens = record.prompt_tokens,
            completion_tokens = record.completion_tokens,
            cost = record.cost(),
            "Record finalized"
        );
        Ok(record)
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prices: PriceTable::defaults(),
        }
    }
}

/// Task text: everything after the marker up to `, with ` or end of line.
fn task_name(rest: &str) -> &str {
    rest.split(TASK_NAME_TERMINATOR).next().unwrap_or(rest).trim_end()
}

/// Parse `<label>: <prompt>, <label>: <completion>`.
fn parse_token_report(line: &str, line_number: usize) -> Result<(u64, u64)> {
    let mut fields = line.trim().split(',');
    let prompt = fields.next().unwrap_or_default();
    let completion = fields.next().ok_or_else(|| {
        AnalysisError::malformed(line_number, "token report without completion field")
    })?;

    Ok((
        parse_count(prompt, line_number)?,
        parse_count(completion, line_number)?,
    ))
}

fn parse_count(field: &str, line_number: usize) -> Result<u64> {
    let value = field.rsplit(": ").next().unwrap_or(field).trim();
    value.parse().map_err(|_| {
        AnalysisError::malformed(line_number, format!("token count {value:?} is not an integer"))
    })
}

/// Final answer carried by an `Action Input` payload, if it has one.
///
/// Only payloads with a `return_type` field count; a missing
/// `final_answer` then means an empty answer.
fn parse_action_input(payload: &str, line_number: usize) -> Result<Option<String>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|source| AnalysisError::InvalidActionInput {
            line: line_number,
            source,
        })?;

    let Some(object) = value.as_object() else {
        return Ok(None);
    };
    if !object.contains_key("return_type") {
        return Ok(None);
    }

    let answer = match object.get("final_answer") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Ok(Some(answer))
}
