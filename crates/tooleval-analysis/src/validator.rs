//! Completeness check of a parsed run against the expected tasks.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::models::{QueryEntry, Record, TaskDefinition};

/// Outcome of [`validate`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Number of task definitions
    pub expected_tasks: usize,
    /// Number of query file entries
    pub queries: usize,
    /// Number of parsed records
    pub records: usize,
    /// Tasks without any record, in task file order
    pub missing: Vec<String>,
}

impl ValidationReport {
    /// Whether every expected task produced a record.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check that the run covers every expected task.
///
/// Fails when the query file and task file disagree in length, or when the
/// number of records differs from the number of tasks. Tasks with no record
/// are only reported.
pub fn validate(
    records: &[Record],
    tasks: &[TaskDefinition],
    queries: &[QueryEntry],
) -> Result<ValidationReport> {
    info!(tasks = tasks.len(), "Validating run");

    if queries.len() != tasks.len() {
        return Err(AnalysisError::CountMismatch {
            what: "query",
            expected: tasks.len(),
            actual: queries.len(),
        });
    }

    let seen: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let missing: Vec<String> = tasks
        .iter()
        .filter(|t| !seen.contains(t.task.as_str()))
        .map(|t| t.task.clone())
        .collect();

    for task in &missing {
        warn!(task = %task, "No result for task");
    }

    if records.len() != tasks.len() {
        return Err(AnalysisError::CountMismatch {
            what: "result",
            expected: tasks.len(),
            actual: records.len(),
        });
    }

    Ok(ValidationReport {
        expected_tasks: tasks.len(),
        queries: queries.len(),
        records: records.len(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::ModelPricing;

    fn record(name: &str) -> Record {
        Record::new(name, "", 0, 0, &ModelPricing::new(0.5, 1.5))
    }

    fn task(text: &str) -> TaskDefinition {
        TaskDefinition {
            task: text.to_string(),
            name: "custom.E.1".to_string(),
            valid_solutions: vec![],
        }
    }

    fn query(text: &str, id: u64) -> QueryEntry {
        QueryEntry {
            query: text.to_string(),
            query_id: id,
            api_list: vec![],
        }
    }

    #[test]
    fn test_complete_run() {
        let records = vec![record("a"), record("b")];
        let tasks = vec![task("a"), task("b")];
        let queries = vec![query("a", 11), query("b", 12)];

        let report = validate(&records, &tasks, &queries).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.records, 2);
        assert_eq!(report.expected_tasks, 2);
    }

    #[test]
    fn test_query_count_mismatch() {
        let err = validate(&[record("a")], &[task("a")], &[]).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::CountMismatch { what: "query", expected: 1, actual: 0 }
        ));
    }

    #[test]
    fn test_result_count_mismatch() {
        let tasks = vec![task("a"), task("b")];
        let queries = vec![query("a", 11), query("b", 12)];

        let err = validate(&[record("a")], &tasks, &queries).unwrap_err();

        assert_eq!(err.to_string(), "result count mismatch: expected 2, got 1");
    }

    #[test]
    fn test_missing_task_is_reported_not_fatal() {
        // A repeated record keeps the count right while one task is absent
        let records = vec![record("a"), record("a")];
        let tasks = vec![task("a"), task("b")];
        let queries = vec![query("a", 11), query("b", 12)];

        let report = validate(&records, &tasks, &queries).unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.missing, vec!["b".to_string()]);
    }
}
