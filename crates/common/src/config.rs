use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "handin.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// The identifier scheme submissions must be named with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_cohort_prefix")]
    pub cohort_prefix: String,

    /// Digits following the cohort prefix.
    #[serde(default = "default_serial_digits")]
    pub serial_digits: usize,

    /// Accepted extensions, without the dot. Also decides which files are scanned at all.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            cohort_prefix: default_cohort_prefix(),
            serial_digits: default_serial_digits(),
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns matched against bare file names.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            include_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    #[serde(default = "default_true")]
    pub autojunk: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { autojunk: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Overrides the `reports` directory next to the scanned folder.
    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default)]
    pub json: bool,

    /// Console-only highlight for pairs at or above this percentage.
    #[serde(default)]
    pub flag_threshold: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Regexes matched against `"<target>: <message>"`; matching events are dropped.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_cohort_prefix() -> String {
    "202314".into()
}

fn default_serial_digits() -> usize {
    3
}

fn default_extensions() -> Vec<String> {
    ["txt", "c", "cpp", "pdf", "l", "y"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse a config document, warning about (but tolerating) unknown keys.
pub fn parse_config(s: &str) -> Result<CheckerConfig, ConfigError> {
    let mut unknown = Vec::new();
    let config: CheckerConfig =
        serde_ignored::deserialize(toml::Deserializer::new(s), |path| {
            unknown.push(path.to_string())
        })?;
    for key in unknown {
        warn!("unknown config key: {key}");
    }
    Ok(config)
}

/// Load `explicit` if given (it must exist), else `handin.toml` in the
/// working directory if present, else the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<CheckerConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                return Ok(CheckerConfig::default());
            }
            fallback
        }
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
    parse_config(&text)
}
