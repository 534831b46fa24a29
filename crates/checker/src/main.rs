mod prompt;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use handin::lazy_header::FileHeaderLayer;
use handin::pipeline::{self, RunObserver, RunOptions};
use handin_common::api::{ClassificationResult, LateSubmission};
use handin_common::config::load_config;
use handin_common::logging::LogIgnoreFilter;
use handin_extract_dispatch::DispatchExtractor;

#[derive(Parser)]
#[command(name = "handin", about = "Check submissions for naming, lateness and similarity")]
struct Args {
    /// Submissions folder (asked for interactively when omitted)
    dir: Option<PathBuf>,

    /// Deadline as "YYYY-MM-DD HH:MM:SS" in local time (asked for when omitted)
    #[arg(long)]
    deadline: Option<String>,

    /// Config file (default: ./handin.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write reports (default: "reports" next to the submissions folder)
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Also write a JSON copy of the report
    #[arg(long)]
    json: bool,

    /// Suppress color output
    #[arg(long)]
    no_color: bool,

    /// Highlight pairs at or above this similarity percentage
    #[arg(long, value_name = "PCT")]
    flag_above: Option<f64>,
}

struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_scan_start(&self, _dir: &Path) {
        println!("Scanning for submission files...");
    }

    fn on_late(&self, late: &LateSubmission) {
        println!("{}", late.to_string().yellow());
    }

    fn on_classified(&self, result: &ClassificationResult) {
        println!("\nScanning complete. Found {} valid files.\n", result.valid.len());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn,handin=info".into()))
        .with(FileHeaderLayer)
        .with(tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(LogIgnoreFilter))
        .init();

    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = load_config(args.config.as_deref())?;

    if let Err(e) = handin_common::logging::set_ignore_patterns(&config.log.ignore) {
        tracing::warn!("invalid log ignore pattern: {e}");
    }

    let dir = match args.dir {
        Some(dir) => dir,
        None => prompt::submissions_dir()?,
    };
    let deadline = match args.deadline {
        Some(d) => d,
        None => prompt::deadline()?,
    };
    let flag_threshold = args.flag_above.or(config.report.flag_threshold);

    let opts = RunOptions {
        dir,
        deadline,
        config,
        reports_dir: args.reports_dir,
        json: args.json,
    };
    let outcome = pipeline::run(&opts, &DispatchExtractor, &ConsoleObserver)?;

    print!("{}", outcome.report.render_console(flag_threshold));
    println!("\nReport saved to: {}", outcome.written.text.display());
    if let Some(json) = &outcome.written.json {
        println!("JSON report saved to: {}", json.display());
    }

    Ok(())
}
