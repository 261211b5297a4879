//! Correctness and difficulty assessment of parsed records.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::models::{Record, TaskDefinition};

/// Mark each record's correctness and difficulty level.
///
/// Records are matched to tasks by their exact task text. A record counts
/// as correct when its response contains any valid solution as a substring.
/// Matching is loose: a short solution such as `5` also matches a
/// response mentioning `15`.
pub fn assess(records: &mut [Record], tasks: &[TaskDefinition]) -> Result<()> {
    let lookup: HashMap<&str, &TaskDefinition> =
        tasks.iter().map(|t| (t.task.as_str(), t)).collect();

    for record in records.iter_mut() {
        let task = lookup
            .get(record.name.as_str())
            .ok_or_else(|| AnalysisError::UnknownTask(record.name.clone()))?;

        let correct = is_correct(&record.response, &task.valid_solutions);
        let level = task.level()?;
        record.set_assessment(correct, level);

        if record.response.is_empty() {
            warn!(task = %record.name, "No response for task");
        }
        debug!(task = %record.name, correct, level = %level, "Record assessed");
    }

    Ok(())
}

/// Whether `response` contains the text of any valid solution.
pub fn is_correct(response: &str, valid_solutions: &[Value]) -> bool {
    valid_solutions
        .iter()
        .any(|solution| response.contains(solution_text(solution).as_ref()))
}

/// Text a solution is matched by.
///
/// Strings match verbatim. Other values are rendered the way the task
/// authors' tooling prints them: `True`/`False`, `None`, `[1, 2]`,
/// `{'a': 1}`, and floats such as `3.0` or `1e-05`.
pub fn solution_text(solution: &Value) -> Cow<'_, str> {
    match solution {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        other => Cow::Owned(display_text(other)),
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => float_text(float),
            _ => number.to_string(),
        },
        Value::String(text) => quoted(text),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(display_text).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", quoted(key), display_text(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Shortest round-trip float text, scientific below 1e-4 and from 1e16.
fn float_text(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => text,
        };
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Single-quoted string, double-quoted when it holds a lone single quote.
fn quoted(text: &str) -> String {
    if text.contains('\'') && !text.contains('"') {
        return format!("\"{}\"", text.replace('\\', "\\\\"));
    }
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}
