//! Integration tests for tooleval-analysis with mock benchmark files.

use std::io::Write;

use tempfile::{NamedTempFile, tempdir};
use tooleval_analysis::{
    AnalysisError, Level, LogParser, PriceTable, StatisticsReport, assess, load_queries,
    load_tasks, validate,
};

/// Create a mock file with the given content.
fn create_mock_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Two task blocks, each with one token report and one final answer.
const TWO_TASK_LOG: &str = r#"[process(0)]now playing Add 17 and 25., with 3 APIs, with query_id 11
Thought: I will use the add tool.
Action: add_for_custom_math
Action Input: {"a": 17, "b": 25}
Observation: {"error": "", "response": "42"}
prompt tokens: 2400, completion tokens: 120
Action: Finish
Action Input: {"return_type": "give_answer", "final_answer": "17 + 25 = 42"}
[process(0)]now playing Divide 10 by 4., with 3 APIs, with query_id 31
Action: divide_for_custom_math
prompt tokens: 1800, completion tokens: 90
Action Input: {"return_type": "give_answer", "final_answer": "The quotient is 2"}
"#;

const TASKS: &str = r#"[
    {"task": "Add 17 and 25.", "name": "custom.1.E.1", "valid_solutions": [42]},
    {"task": "Divide 10 by 4.", "name": "custom.1.H.1", "valid_solutions": [2.5, "5/2"]}
]"#;

const QUERIES: &str = r#"[
    {"query": "Add 17 and 25.", "query_id": 11, "api_list": []},
    {"query": "Divide 10 by 4.", "query_id": 31, "api_list": [
        {"category_name": "Customized", "tool_name": "custom math", "api_name": "divide"}
    ]}
]"#;

#[test]
fn test_analyze_then_assess_two_tasks() {
    let log = create_mock_file(TWO_TASK_LOG, ".txt");
    let tasks_file = create_mock_file(TASKS, ".json");

    let parser = LogParser::default();
    let mut records = parser.parse_file(log.path()).unwrap();
    let tasks = load_tasks(tasks_file.path()).unwrap();

    assess(&mut records, &tasks).unwrap();

    assert_eq!(records.len(), 2);

    assert_eq!(records[0].name, "Add 17 and 25.");
    assert_eq!(records[0].response, "17 + 25 = 42");
    assert!(records[0].is_correct());
    assert_eq!(records[0].level(), Some(Level::Easy));
    // 0.5e-6 * 2400 + 1.5e-6 * 120 = 0.00138
    assert!((records[0].cost() - 0.00138).abs() < 1e-12);

    assert_eq!(records[1].name, "Divide 10 by 4.");
    assert_eq!(records[1].response, "The quotient is 2");
    assert!(!records[1].is_correct());
    assert_eq!(records[1].level(), Some(Level::Hard));
}

#[test]
fn test_validate_against_files() {
    let log = create_mock_file(TWO_TASK_LOG, ".txt");
    let tasks_file = create_mock_file(TASKS, ".json");
    let queries_file = create_mock_file(QUERIES, ".json");

    let records = LogParser::default().parse_file(log.path()).unwrap();
    let tasks = load_tasks(tasks_file.path()).unwrap();
    let queries = load_queries(queries_file.path()).unwrap();

    let report = validate(&records, &tasks, &queries).unwrap();

    assert!(report.is_complete());
    assert_eq!(queries[1].api_list[0].api_name, "divide");
}

#[test]
fn test_missing_log_file() {
    let dir = tempdir().unwrap();
    let err = LogParser::default()
        .parse_file(dir.path().join("LOG.txt"))
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Io(_)));
}

#[test]
fn test_full_statistics_pipeline() {
    let mut log = String::new();
    let mut tasks = Vec::new();
    // Four tasks per level; the first three of each level answer correctly
    for (tag, level_digit) in [("E", 1), ("M", 2), ("H", 3)] {
        for i in 1..=4u64 {
            let task = format!("Task {tag}{i}");
            let answer = if i < 4 { "answer 7" } else { "no idea" };
            log.push_str(&format!("[process(0)]now playing {task}, with 2 APIs\n"));
            log.push_str(&format!(
                "prompt tokens: {}, completion tokens: 0\n",
                i * 1000 * level_digit
            ));
            log.push_str(&format!(
                "Action Input: {{\"return_type\": \"give_answer\", \"final_answer\": \"{answer}\"}}\n"
            ));
            tasks.push(serde_json::json!({
                "task": task,
                "name": format!("custom.{tag}.{i}"),
                "valid_solutions": [7],
            }));
        }
    }

    let tasks_file = create_mock_file(&serde_json::to_string(&tasks).unwrap(), ".json");
    let mut records = LogParser::default().parse_str(&log).unwrap();
    let tasks = load_tasks(tasks_file.path()).unwrap();
    assess(&mut records, &tasks).unwrap();

    let report = StatisticsReport::compute(&records).unwrap();

    for level in Level::ALL {
        let stats = report.level(level).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.accuracy, 0.75);
    }

    // Easy costs: 0.0005, 0.001, 0.0015, 0.002 -> mean of the middle two
    let easy = report.level(Level::Easy).unwrap();
    assert!((easy.iqm_cost - 0.00125).abs() < 1e-12);
}

#[test]
fn test_custom_pricing_changes_costs() {
    let prices = PriceTable::defaults();
    let cheap = LogParser::new("gpt-4o-mini-2024-07-18", prices.clone()).unwrap();
    let pricey = LogParser::new("gpt-4-turbo-2024-04-09", prices).unwrap();

    let cheap_records = cheap.parse_str(TWO_TASK_LOG).unwrap();
    let pricey_records = pricey.parse_str(TWO_TASK_LOG).unwrap();

    assert!(cheap_records[0].cost() < pricey_records[0].cost());
    // 10e-6 * 2400 + 30e-6 * 120
    assert!((pricey_records[0].cost() - 0.0276).abs() < 1e-12);
}
