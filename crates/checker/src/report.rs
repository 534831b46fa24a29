use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use colored::Colorize;
use serde::Serialize;

use handin_common::api::SimilarityPair;

pub const REPORT_TITLE: &str = "Assignment Report";
const REPORT_DIR_NAME: &str = "reports";

/// The four report sections, always rendered in this order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub valid: Vec<String>,
    pub wrongly_named: Vec<String>,
    pub late: Vec<String>,
    pub similarities: Vec<SimilarityPair>,
}

#[derive(Clone, Copy)]
enum Part<'a> {
    Title,
    Heading,
    Item,
    Late,
    Pair(&'a SimilarityPair),
    Empty,
}

impl Report {
    pub fn new(
        valid: Vec<String>,
        wrongly_named: Vec<String>,
        late: Vec<String>,
        similarities: Vec<SimilarityPair>,
    ) -> Self {
        Self { valid, wrongly_named, late, similarities }
    }

    /// Plain text, as written to the report file.
    pub fn render(&self) -> String {
        self.render_with(&|_, text| text.to_string())
    }

    /// The same text with terminal colours; pairs scoring at least
    /// `flag_threshold` are highlighted.
    pub fn render_console(&self, flag_threshold: Option<f64>) -> String {
        self.render_with(&|part, text| match part {
            Part::Title => text.bold().to_string(),
            Part::Heading => text.bold().cyan().to_string(),
            Part::Late => text.yellow().to_string(),
            Part::Pair(pair) if flag_threshold.is_some_and(|t| pair.score.value() >= t) => {
                text.red().bold().to_string()
            }
            Part::Empty => text.dimmed().to_string(),
            Part::Item | Part::Pair(_) => text.to_string(),
        })
    }

    fn render_with(&self, paint: &dyn Fn(Part<'_>, &str) -> String) -> String {
        let mut out = String::new();
        out.push_str(&paint(Part::Title, REPORT_TITLE));
        out.push('\n');

        let names = |list: &[String], part: Part<'static>| -> Vec<(Part<'static>, String)> {
            list.iter().map(|n| (part, n.clone())).collect()
        };
        section(&mut out, paint, "Valid Files:", names(&self.valid, Part::Item));
        section(&mut out, paint, "Wrongly Named Files:", names(&self.wrongly_named, Part::Item));
        section(&mut out, paint, "Late Submissions:", names(&self.late, Part::Late));
        section(
            &mut out,
            paint,
            "Similarities:",
            self.similarities.iter().map(|p| (Part::Pair(p), p.to_string())).collect(),
        );
        out
    }
}

fn section(
    out: &mut String,
    paint: &dyn Fn(Part<'_>, &str) -> String,
    heading: &str,
    items: Vec<(Part<'_>, String)>,
) {
    out.push('\n');
    out.push_str(&paint(Part::Heading, heading));
    out.push('\n');
    if items.is_empty() {
        out.push_str("  ");
        out.push_str(&paint(Part::Empty, "None"));
        out.push('\n');
    }
    for (part, text) in items {
        out.push_str("  - ");
        out.push_str(&paint(part, &text));
        out.push('\n');
    }
}

/// `reports` next to the scanned directory (inside it when it is a root).
pub fn default_report_dir(scanned: &Path) -> io::Result<PathBuf> {
    let scanned = std::fs::canonicalize(scanned)?;
    Ok(scanned.parent().unwrap_or(&scanned).join(REPORT_DIR_NAME))
}

#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub text: PathBuf,
    pub json: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    #[serde(flatten)]
    report: &'a Report,
}

/// An existing directory reports are written into.
#[derive(Debug, Clone)]
pub struct ReportDir {
    path: PathBuf,
}

impl ReportDir {
    /// Create the directory if needed. Safe to call repeatedly.
    pub fn prepare(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `report_<YYYYMMDD_HHMMSS>.txt` (and its `.json` twin when asked).
    ///
    /// Existing reports are never touched: a taken name gets a `_2`, `_3`, …
    /// suffix instead. Both names are reserved before either file is written.
    pub fn write(&self, report: &Report, generated_at: NaiveDateTime, json: bool) -> io::Result<WrittenReport> {
        let base = format!("report_{}", generated_at.format("%Y%m%d_%H%M%S"));
        let (stem, mut file, json_file) = self.create_unique(&base, json)?;
        file.write_all(report.render().as_bytes())?;
        file.flush()?;

        let json = if let Some(json_file) = json_file {
            let path = self.path.join(format!("{stem}.json"));
            let mut writer = BufWriter::new(json_file);
            let doc = JsonReport {
                generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                report,
            };
            serde_json::to_writer_pretty(&mut writer, &doc).map_err(io::Error::other)?;
            writer.flush()?;
            Some(path)
        } else {
            None
        };

        Ok(WrittenReport {
            text: self.path.join(format!("{stem}.txt")),
            json,
        })
    }

    /// First free `<base>[_n]` stem, with the `.txt` and (optionally) `.json`
    /// files already created. A stem counts as taken if either name exists.
    fn create_unique(&self, base: &str, json: bool) -> io::Result<(String, File, Option<File>)> {
        let mut n = 1;
        loop {
            let stem = if n == 1 { base.to_string() } else { format!("{base}_{n}") };
            n += 1;

            let text_path = self.path.join(format!("{stem}.txt"));
            let text = match create_new(&text_path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };
            if !json {
                return Ok((stem, text, None));
            }

            match create_new(&self.path.join(format!("{stem}.json"))) {
                Ok(json_file) => return Ok((stem, text, Some(json_file))),
                Err(e) => {
                    // Release the empty text file we just claimed.
                    drop(text);
                    std::fs::remove_file(&text_path)?;
                    if e.kind() != io::ErrorKind::AlreadyExists {
                        return Err(e);
                    }
                }
            }
        }
    }
}

fn create_new(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
