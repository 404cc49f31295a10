//! CLI entry point for the dataset utilities.

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use dotenv::dotenv;
use lex_datasets::{
    DatasetFetcher, FetchConfig, FetchOutcome, NullReport, check_for_null_entries,
    filter_incomplete_entries, load_csv,
};
use polars::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Fetch datasets and inspect them for missing values",
    long_about = "Fetch a Kaggle dataset into ./data and inspect tables for null entries.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  KAGGLE_USERNAME, KAGGLE_KEY    Kaggle API credentials\n  \
                  KAGGLE_CONFIG_DIR              Directory holding kaggle.json\n\n\
                  EXAMPLES:\n  \
                  # Replace ./data with a fresh copy of the Netflix dataset\n  \
                  lex-datasets\n\n  \
                  # Report null columns and list titles without a director\n  \
                  lex-datasets inspect data/netflix_titles.csv --column director"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the dataset and move it into the data directory (default)
    Fetch(FetchArgs),
    /// Report null columns of a CSV file
    Inspect(InspectArgs),
}

#[derive(ClapArgs, Debug, Default)]
struct FetchArgs {
    /// Kaggle dataset page URL or owner/slug id
    #[arg(long)]
    source: Option<String>,

    /// Name of the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory to operate in
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Reuse an already downloaded copy instead of forcing a new download
    #[arg(long)]
    no_force: bool,
}

#[derive(ClapArgs, Debug)]
struct InspectArgs {
    /// Path to the CSV file to inspect
    input: PathBuf,

    /// Print the rows where this column is null
    #[arg(short, long)]
    column: Option<String>,

    /// Output JSON to stdout instead of a human-readable summary
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json_output = matches!(&cli.command, Some(Command::Inspect(args)) if args.json);
    init_logging(&cli.log_level, cli.quiet, json_output);

    // Credentials may live in a .env file
    dotenv().ok();

    match cli.command {
        None => run_fetch(FetchArgs::default(), cli.quiet),
        Some(Command::Fetch(args)) => run_fetch(args, cli.quiet),
        Some(Command::Inspect(args)) => run_inspect(&args),
    }
}

fn run_fetch(args: FetchArgs, quiet: bool) -> Result<()> {
    let mut builder = FetchConfig::builder().force(!args.no_force);
    if let Some(source) = args.source {
        builder = builder.source_url(source);
    }
    if let Some(data_dir) = args.data_dir {
        builder = builder.data_dir(data_dir);
    }
    if let Some(work_dir) = args.work_dir {
        builder = builder.work_dir(work_dir);
    }
    let config = builder.build()?;

    let outcome = DatasetFetcher::kaggle(config)
        .and_then(|fetcher| fetcher.download_dataset())
        .map_err(|e| {
            error!("Fetch failed: {}", e);
            anyhow!(e)
        })?;

    if !quiet {
        print_fetch_summary(&outcome);
    }
    Ok(())
}

/// Note: uses `println!` for user-facing output, independent of log level.
fn print_fetch_summary(outcome: &FetchOutcome) {
    println!(
        "Fetched {} into {} ({} files{})",
        outcome.source,
        outcome.data_dir.display(),
        outcome.file_count,
        if outcome.reused_staging {
            ", reused existing download"
        } else {
            ""
        }
    );
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    info!("Loading dataset from: {}", args.input.display());
    let df = load_csv(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    info!("Dataset loaded successfully: {:?}", df.shape());

    let report = check_for_null_entries(&df);
    let incomplete = match &args.column {
        Some(column) => Some(filter_incomplete_entries(&df, column)?),
        None => None,
    };

    if args.json {
        let mut output = json!({ "input": args.input.display().to_string(), "report": report });
        if let (Some(column), Some(rows)) = (&args.column, &incomplete) {
            output["incomplete"] = json!({
                "column": column,
                "row_count": rows.height(),
                "rows": rows_as_json(rows)?,
            });
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_null_report(&args.input, &report);
    if let (Some(column), Some(rows)) = (&args.column, &incomplete) {
        println!();
        println!("Rows with null '{}': {}", column, rows.height());
        if rows.height() > 0 {
            println!("{}", rows);
        }
    }
    Ok(())
}

fn print_null_report(input: &std::path::Path, report: &NullReport) {
    println!("{}", "=".repeat(60));
    println!(
        "NULL REPORT: {} ({} rows x {} columns)",
        input.display(),
        report.row_count,
        report.columns.len()
    );
    println!("{}", "=".repeat(60));
    println!("{:<30} {:<10} {:<10}", "Column", "Has nulls", "Count");
    println!("{}", "-".repeat(52));
    for col in &report.columns {
        println!(
            "{:<30} {:<10} {:<10}",
            truncate_str(&col.name, 29),
            col.has_nulls,
            col.null_count
        );
    }
}

/// Convert rows to JSON objects keyed by column name.
fn rows_as_json(df: &DataFrame) -> Result<Vec<serde_json::Value>> {
    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut row = serde_json::Map::new();
        for col in df.get_columns() {
            let value = col.get(idx)?;
            let value = match value {
                AnyValue::Null => serde_json::Value::Null,
                AnyValue::Boolean(b) => json!(b),
                AnyValue::String(s) => json!(s),
                AnyValue::StringOwned(s) => json!(s.as_str()),
                other if other.dtype().is_integer() => match other.extract::<i64>() {
                    Some(n) => json!(n),
                    None => json!(other.to_string()),
                },
                other => match other.extract::<f64>() {
                    Some(n) => json!(n),
                    None => json!(other.to_string()),
                },
            };
            row.insert(col.name().to_string(), value);
        }
        rows.push(serde_json::Value::Object(row));
    }
    Ok(rows)
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
