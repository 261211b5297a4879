//! Query file generation.

use tooleval_analysis::{AnalysisError, ApiReference, QueryEntry, TaskDefinition};
use tracing::info;

use crate::error::{Result, SchemaError};

/// Numeric query id of a task: the level digit followed by the task number.
///
/// `custom.M.7` becomes 27, `custom.E.12` becomes 112.
pub fn query_id(task: &TaskDefinition) -> Result<u64> {
    let level = task.level()?;
    let number = task.number()?;

    let id = format!("{}{}", level.query_digit(), number);
    id.parse().map_err(|_| {
        SchemaError::Task(AnalysisError::invalid_task_name(
            &task.name,
            "query id out of range",
        ))
    })
}

/// One query per task, in task file order, each offering every API.
pub fn build_queries(
    tasks: &[TaskDefinition],
    api_list: &[ApiReference],
) -> Result<Vec<QueryEntry>> {
    let queries = tasks
        .iter()
        .map(|task| {
            Ok(QueryEntry {
                query: task.task.clone(),
                query_id: query_id(task)?,
                api_list: api_list.to_vec(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(queries = queries.len(), apis = api_list.len(), "Queries built");
    Ok(queries)
}
