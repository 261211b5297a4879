//! tooleval - offline analysis of LLM tool-use benchmark runs
//!
//! Parses the execution log of a benchmark run, checks it against the task
//! and query files, and reports accuracy and cost per difficulty level. Also
//! generates the tool catalog and query files the benchmark harness loads.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a run with the configured paths
//! tooleval analyze
//!
//! # Analyze another log, priced for another model, as JSON
//! tooleval analyze --log runs/LOG.txt --model gpt-4o-2024-05-13 --json
//!
//! # Generate the tool catalog and the query file
//! tooleval generate-tools --manifest api_manifest.json --queries instruction/custom_query.json
//!
//! # With verbose logging to a directory
//! tooleval -v --log-dir /tmp/tooleval-logs analyze
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tooleval_analysis::{LogParser, StatisticsReport, assess, load_queries, load_tasks, validate};
use tooleval_config::EvalConfig;
use tooleval_core::{EvalError, LogGuard, init_logging};
use tooleval_schema::{build_catalog, build_queries, load_catalog, load_manifest, write_json};
use tracing::{debug, error, info};

mod report;

use report::{AnalysisReport, GenerationSummary};

/// Offline analysis and tool-catalog generation for LLM tool-use benchmarks
#[derive(Parser, Debug)]
#[command(name = "tooleval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.tooleval/config.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (increases log level)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for JSON log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a run log and report accuracy and cost per level
    Analyze(AnalyzeArgs),

    /// Generate the tool catalog from a function manifest
    GenerateTools(GenerateToolsArgs),

    /// Generate the query file from the task file and an existing catalog
    GenerateQueries(GenerateQueriesArgs),
}

#[derive(clap::Args, Debug, Default)]
struct AnalyzeArgs {
    /// Execution log of the run
    #[arg(long)]
    log: Option<PathBuf>,

    /// Task definitions with valid solutions
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Query file given to the harness
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Model whose prices cost the run
    #[arg(long)]
    model: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug, Default)]
struct GenerateToolsArgs {
    /// Function manifest to describe
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Catalog file to write
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Also write the query file to this path
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Task file for the query file (implies writing queries)
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Skip functions with array parameters
    #[arg(long)]
    no_array_support: bool,
}

#[derive(clap::Args, Debug, Default)]
struct GenerateQueriesArgs {
    /// Task definitions
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Existing catalog providing the API list
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Query file to write
    #[arg(long)]
    queries: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };
    debug!(file_log = guard.has_file_log(), "Logging ready");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("tooleval failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e.downcast_ref::<EvalError>().and_then(EvalError::hint) {
                eprintln!("Hint: {hint}");
            }
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> tooleval_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = EvalConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Analyze(args) => {
            let json = args.json;
            let report = analyze(&config, args)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{report}");
            }
        }
        Commands::GenerateTools(args) => {
            let summary = generate_tools(&config, args)?;
            print!("{summary}");
        }
        Commands::GenerateQueries(args) => {
            let summary = generate_queries(&config, args)?;
            print!("{summary}");
        }
    }

    Ok(())
}

/// Parse, validate, assess and summarize one run.
fn analyze(config: &EvalConfig, args: AnalyzeArgs) -> anyhow::Result<AnalysisReport> {
    let log = args.log.unwrap_or_else(|| config.paths.log.clone());
    let tasks_path = args.tasks.unwrap_or_else(|| config.paths.tasks.clone());
    let queries_path = args.queries.unwrap_or_else(|| config.paths.queries.clone());
    let model = args.model.unwrap_or_else(|| config.model.clone());

    let parser = LogParser::new(model, config.price_table())?;
    let mut records = parser
        .parse_file(&log)
        .with_context(|| format!("failed to parse log {}", log.display()))?;
    let tasks = load_tasks(&tasks_path)
        .with_context(|| format!("failed to load tasks {}", tasks_path.display()))?;
    let queries = load_queries(&queries_path)
        .with_context(|| format!("failed to load queries {}", queries_path.display()))?;

    let validation = validate(&records, &tasks, &queries)?;
    assess(&mut records, &tasks)?;
    let statistics = StatisticsReport::compute(&records)?;

    info!(records = records.len(), model = parser.model(), "Analysis complete");

    Ok(AnalysisReport {
        model: parser.model().to_string(),
        validation,
        statistics,
        records,
    })
}

/// Write the tool catalog, and the query file when asked to.
fn generate_tools(
    config: &EvalConfig,
    args: GenerateToolsArgs,
) -> anyhow::Result<GenerationSummary> {
    let manifest = args.manifest.unwrap_or_else(|| config.paths.manifest.clone());
    let catalog_path = args.catalog.unwrap_or_else(|| config.paths.catalog.clone());

    let mut options = config.catalog.clone();
    if args.no_array_support {
        options.array_support = false;
    }

    let functions = load_manifest(&manifest)
        .with_context(|| format!("failed to load manifest {}", manifest.display()))?;
    let generated = build_catalog(&functions, &options)?;
    write_json(&catalog_path, &generated.catalog)
        .with_context(|| format!("failed to write catalog {}", catalog_path.display()))?;

    let mut summary = GenerationSummary {
        catalog: Some(catalog_path),
        apis: generated.catalog.api_list.len(),
        skipped: generated.skipped,
        queries: None,
        query_count: 0,
    };

    if args.queries.is_some() || args.tasks.is_some() {
        let tasks_path = args.tasks.unwrap_or_else(|| config.paths.tasks.clone());
        let queries_path = args.queries.unwrap_or_else(|| config.paths.queries.clone());
        summary.query_count =
            write_queries(&tasks_path, &queries_path, &generated.api_references)?;
        summary.queries = Some(queries_path);
    }

    Ok(summary)
}

/// Rebuild the query file from the task file and an existing catalog.
fn generate_queries(
    config: &EvalConfig,
    args: GenerateQueriesArgs,
) -> anyhow::Result<GenerationSummary> {
    let tasks_path = args.tasks.unwrap_or_else(|| config.paths.tasks.clone());
    let catalog_path = args.catalog.unwrap_or_else(|| config.paths.catalog.clone());
    let queries_path = args.queries.unwrap_or_else(|| config.paths.queries.clone());

    let catalog = load_catalog(&catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    let api_references = catalog.api_references(&config.catalog.category_name);
    let query_count = write_queries(&tasks_path, &queries_path, &api_references)?;

    Ok(GenerationSummary {
        catalog: None,
        apis: api_references.len(),
        skipped: Vec::new(),
        queries: Some(queries_path),
        query_count,
    })
}

fn write_queries(
    tasks_path: &Path,
    queries_path: &Path,
    api_references: &[tooleval_analysis::ApiReference],
) -> anyhow::Result<usize> {
    let tasks = load_tasks(tasks_path)
        .with_context(|| format!("failed to load tasks {}", tasks_path.display()))?;
    let queries = build_queries(&tasks, api_references)?;
    write_json(queries_path, &queries)
        .with_context(|| format!("failed to write queries {}", queries_path.display()))?;
    Ok(queries.len())
}
