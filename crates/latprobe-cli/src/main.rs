//! latprobe: flag common production latency causes in a Prometheus snapshot.
//!
//! Pipeline: load file -> parse -> detect -> render to stdout.
//! Logs go to stderr, filtered by `RUST_LOG` (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use latprobe_cli::report::{self, OutputFormat};
use latprobe_cli::{analyze, config, input};
use latprobe_core::error::{ErrorKind, LatProbeError, Result};
use latprobe_core::RuleSet;

#[derive(Parser)]
#[command(
    name = "latprobe",
    version,
    about = "Detect common latency issues from Prometheus metrics",
    after_help = "Examples:\n  latprobe sample_metrics.txt\n  latprobe /path/to/your/metrics.txt --format json"
)]
struct Cli {
    /// Path to Prometheus metrics file (text format)
    metrics_file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// YAML file with extra rule patterns
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let rules = match &cli.config {
        Some(path) => config::load_from_file(path)?.rule_set(),
        None => RuleSet::default(),
    };

    let text = input::read_metrics(&cli.metrics_file)?;

    if cli.format == OutputFormat::Text {
        println!("🔍 Analyzing metrics...\n");
    }

    let issues = analyze(&text, rules);
    tracing::info!(issues = issues.len(), file = %cli.metrics_file.display(), "analysis complete");

    print!("{}", report::render(&issues, cli.format)?);
    Ok(())
}

fn report_error(e: &LatProbeError) {
    tracing::debug!(code = e.kind().as_str(), "run failed");
    match e.kind() {
        // Already reads as "Error reading file: ...".
        ErrorKind::Unreadable => eprintln!("❌ {e}"),
        _ => eprintln!("❌ Error: {e}"),
    }
}
