use std::time::SystemTime;

use chrono::{DateTime, Local};
use regex::Regex;
use tracing::debug;

use handin_common::api::{ClassificationResult, Deadline, LateSubmission};
use handin_common::config::NamingConfig;

#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    #[error("cohort prefix {0:?} must be a non-empty string of ASCII digits")]
    CohortPrefix(String),

    #[error("serial_digits must be at least 1")]
    SerialDigits,

    #[error("at least one accepted extension is required")]
    NoExtensions,

    #[error("extension {0:?} must be non-empty and alphanumeric")]
    Extension(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("reading modification time of {name}: {source}")]
    ModifiedTime {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// The full-name pattern a valid submission must match:
/// `<cohort prefix><N digits>.<accepted extension>` and nothing else.
#[derive(Debug, Clone)]
pub struct NamingRule {
    pattern: Regex,
}

impl NamingRule {
    pub fn new(cfg: &NamingConfig) -> Result<Self, NamingError> {
        let prefix = &cfg.cohort_prefix;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NamingError::CohortPrefix(prefix.clone()));
        }
        if cfg.serial_digits == 0 {
            return Err(NamingError::SerialDigits);
        }
        if cfg.extensions.is_empty() {
            return Err(NamingError::NoExtensions);
        }
        if let Some(bad) = cfg
            .extensions
            .iter()
            .find(|e| e.is_empty() || !e.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(NamingError::Extension(bad.clone()));
        }

        let pattern = format!(
            r"^{}[0-9]{{{}}}\.(?:{})$",
            regex::escape(prefix),
            cfg.serial_digits,
            cfg.extensions.join("|"),
        );
        debug!("naming pattern: {pattern}");
        Ok(Self { pattern: Regex::new(&pattern)? })
    }

    /// Case-sensitive, whole-name match.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Split scanned names into valid / wrongly named, and flag late valid ones.
///
/// Only valid names have their modification time looked up; a failed lookup
/// aborts the whole classification with the offending name attached.
/// `on_late` fires once per late file, in scan order.
pub fn classify<L, N>(
    names: &[String],
    rule: &NamingRule,
    deadline: &Deadline,
    mut modified_at: L,
    mut on_late: N,
) -> Result<ClassificationResult, ClassifyError>
where
    L: FnMut(&str) -> std::io::Result<SystemTime>,
    N: FnMut(&LateSubmission),
{
    let mut result = ClassificationResult::default();

    for name in names {
        if !rule.matches(name) {
            result.wrongly_named.push(name.clone());
            continue;
        }
        result.valid.push(name.clone());

        let mtime = modified_at(name).map_err(|source| ClassifyError::ModifiedTime {
            name: name.clone(),
            source,
        })?;
        // Deadlines are wall-clock local times, so compare in that frame.
        let submitted_at = DateTime::<Local>::from(mtime).naive_local();
        if deadline.is_missed_by(submitted_at) {
            let late = LateSubmission { name: name.clone(), submitted_at };
            on_late(&late);
            result.late.push(late.name);
        }
    }

    Ok(result)
}
