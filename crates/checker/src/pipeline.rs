use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use handin_common::api::{ClassificationResult, Deadline, LateSubmission};
use handin_common::config::CheckerConfig;
use handin_common::extract::Extractor;

use crate::classify::{classify, NamingRule};
use crate::report::{default_report_dir, Report, ReportDir, WrittenReport};
use crate::scan;
use crate::similarity::Analyzer;

/// Hooks for the user-visible side effects of a run. All default to no-ops.
pub trait RunObserver {
    fn on_scan_start(&self, _dir: &std::path::Path) {}
    fn on_late(&self, _late: &LateSubmission) {}
    fn on_classified(&self, _result: &ClassificationResult) {}
}

/// Observer for silent (test / library) runs.
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dir: PathBuf,
    /// Raw `YYYY-MM-DD HH:MM:SS` input; validated before anything else happens.
    pub deadline: String,
    pub config: CheckerConfig,
    /// Overrides `config.report.dir` and the default sibling `reports` dir.
    pub reports_dir: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub classification: ClassificationResult,
    pub report: Report,
    pub written: WrittenReport,
}

/// Scan, classify, compare and write the report for one submissions folder.
pub fn run(opts: &RunOptions, extractor: &dyn Extractor, observer: &dyn RunObserver) -> Result<RunOutcome> {
    let deadline = Deadline::parse(&opts.deadline)?;
    let rule = NamingRule::new(&opts.config.naming).context("invalid naming configuration")?;

    let report_path = match (&opts.reports_dir, &opts.config.report.dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => default_report_dir(&opts.dir)
            .with_context(|| format!("scanning {}", opts.dir.display()))?,
    };
    let reports = ReportDir::prepare(&report_path)
        .with_context(|| format!("preparing report directory {}", report_path.display()))?;

    observer.on_scan_start(&opts.dir);
    let names = scan::list_submissions(&opts.dir, &opts.config.scan, &opts.config.naming)
        .with_context(|| format!("scanning {}", opts.dir.display()))?;
    info!("{} submission files in {}", names.len(), opts.dir.display());

    let classification = classify(
        &names,
        &rule,
        &deadline,
        |name| scan::modified_time(&opts.dir, name),
        |late| observer.on_late(late),
    )
    .context("classifying submissions")?;
    observer.on_classified(&classification);
    info!(
        "{} valid, {} wrongly named, {} late",
        classification.valid.len(),
        classification.wrongly_named.len(),
        classification.late.len()
    );

    let similarities = Analyzer::new(extractor, &opts.dir, opts.config.similarity.autojunk)
        .analyze(&classification.valid);
    info!("{} similarity pairs", similarities.len());

    let report = Report::new(
        classification.valid.clone(),
        classification.wrongly_named.clone(),
        classification.late.clone(),
        similarities,
    );
    let json = opts.json || opts.config.report.json;
    let written = reports
        .write(&report, Local::now().naive_local(), json)
        .with_context(|| format!("writing report to {}", reports.path().display()))?;

    Ok(RunOutcome { classification, report, written })
}
