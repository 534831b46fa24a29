use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

/// Timestamp layout accepted for deadlines and used when echoing submission times.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lower-cased extension of a file name, without the dot.
///
/// Returns an empty string for names without one (including dot-files such
/// as `.txt`, which have a stem but no extension).
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

// ── Deadline ──────────────────────────────────────────────────────────────────

/// The single submission cut-off for a run, in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Deadline(NaiveDateTime);

#[derive(Debug, thiserror::Error)]
#[error("invalid deadline {input:?}: expected YYYY-MM-DD HH:MM:SS")]
pub struct DeadlineError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

impl Deadline {
    pub fn parse(input: &str) -> Result<Self, DeadlineError> {
        NaiveDateTime::parse_from_str(input.trim(), DEADLINE_FORMAT)
            .map(Deadline)
            .map_err(|source| DeadlineError { input: input.to_string(), source })
    }

    pub fn at(&self) -> NaiveDateTime {
        self.0
    }

    /// Strictly after: a file stamped exactly at the deadline is on time.
    pub fn is_missed_by(&self, submitted_at: NaiveDateTime) -> bool {
        submitted_at > self.0
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DEADLINE_FORMAT))
    }
}

// ── Classification ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LateSubmission {
    pub name: String,
    pub submitted_at: NaiveDateTime,
}

impl fmt::Display for LateSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LATE SUBMISSION: {} submitted at {} (after deadline!)",
            self.name,
            self.submitted_at.format(DEADLINE_FORMAT)
        )
    }
}

/// Outcome of checking a directory snapshot against the naming rule and deadline.
///
/// `valid` and `wrongly_named` partition the scanned names; `late` is a
/// subsequence of `valid`. All three keep scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub valid: Vec<String>,
    pub wrongly_named: Vec<String>,
    pub late: Vec<String>,
}

// ── Similarity ────────────────────────────────────────────────────────────────

/// A similarity percentage in `[0.0, 100.0]`, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Scale a `[0, 1]` ratio to a percentage and round it.
    pub fn from_ratio(ratio: f64) -> Self {
        Self::from_percent(ratio * 100.0)
    }

    /// Round half-to-even on the exact binary value, two decimals.
    pub fn from_percent(percent: f64) -> Self {
        let rounded = format!("{percent:.2}").parse().unwrap_or(percent);
        Score(rounded)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    // Shortest round-trip form, always with a fractional part: 100.0, 66.67, 0.0
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// One unordered pair from the same extension group, in scan order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityPair {
    pub first: String,
    pub second: String,
    pub score: Score,
}

impl fmt::Display for SimilarityPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {} → {}% similar", self.first, self.second, self.score)
    }
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// Why a file produced no text. Always absorbed before it reaches the report.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing document {}: {reason}", path.display())]
    Document { path: PathBuf, reason: String },

    #[error("extractor panicked on {}", path.display())]
    Panicked { path: PathBuf },

    #[error("no extractor for extension {extension:?}")]
    Unsupported { extension: String },
}

pub type Extraction = Result<String, ExtractError>;
