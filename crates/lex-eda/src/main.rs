//! CLI entry point for the profiling engine.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use lex_eda::{Dataset, EdaProfiler, ProfilerConfig, ReportEnvelope, ReportGenerator, load_csv};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Statistical profiling for tabular datasets",
    long_about = "Profiles every column of a CSV file, compares features against a binary \
                  outcome column and derives insights and preprocessing recommendations.\n\n\
                  EXAMPLES:\n  \
                  # Profile with the conventional 'target' outcome column\n  \
                  lex-eda -i heart.csv\n\n  \
                  # Name the outcome column and save the JSON report\n  \
                  lex-eda -i diabetes.csv --target Outcome -r -o results/\n\n  \
                  # Machine-readable output only\n  \
                  lex-eda -i heart.csv --json | jq .report.insights"
)]
struct Args {
    /// Path to the CSV file to profile
    #[arg(short, long)]
    input: String,

    /// Binary outcome column
    ///
    /// If not specified, a column named "target" is used when present
    #[arg(short, long, conflicts_with = "no_outcome")]
    target: Option<String>,

    /// Skip outcome analysis even when a "target" column exists
    #[arg(long)]
    no_outcome: bool,

    /// Output directory for the report file
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// IQR multiplier for outlier bounds
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Output the JSON report to stdout instead of the text summary
    ///
    /// Disables all logs so stdout carries only JSON.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_eda_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
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
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut builder = ProfilerConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .analyze_outcome(!args.no_outcome);
    if let Some(ref target) = args.target {
        builder = builder.outcome_column(target);
    }
    let config = builder.build()?;

    info!("Loading dataset from: {}", args.input);
    let df = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", df.shape());

    let dataset = Dataset::from_dataframe(&df)?;
    let profiler = EdaProfiler::new(config)?;

    let start = Instant::now();
    let report = profiler.profile(&dataset).map_err(|e| {
        error!("Profiling failed: {}", e);
        e
    })?;
    let envelope = ReportEnvelope::new(&args.input, report, start.elapsed());

    handle_output(&envelope, &args)
}

/// Handle report output based on CLI flags.
///
/// Output behavior:
/// - Default: Print text summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
fn handle_output(envelope: &ReportEnvelope, args: &Args) -> Result<()> {
    if args.emit_report {
        let stem = extract_file_stem(&args.input);
        let generator = ReportGenerator::new(&args.output);
        let report_path = generator
            .write_report_to_file(envelope, &stem)
            .context("Writing report file")?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(envelope)?);
        return Ok(());
    }

    println!();
    println!("{}", ReportGenerator::render_summary(envelope));
    if !args.emit_report {
        println!("Use --json for machine-readable output");
        println!("Use --emit-report to save the JSON report");
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
