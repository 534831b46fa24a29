use std::path::Path;
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};
use walkdir::WalkDir;

use handin_common::config::{NamingConfig, ScanConfig};

/// Snapshot the submission names directly inside `dir`.
///
/// Only regular files whose name ends (case-insensitively) with an accepted
/// extension are returned; `WRONG.TXT` is scanned, `notes.docx` is not.
/// Subdirectories are not descended into. Names are sorted so the report
/// does not depend on platform directory order.
pub fn list_submissions(dir: &Path, scan: &ScanConfig, naming: &NamingConfig) -> Result<Vec<String>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let excludes = build_globset(&scan.exclude)?;
    let suffixes: Vec<String> = naming
        .extensions
        .iter()
        .map(|e| format!(".{}", e.to_lowercase()))
        .collect();

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("reading directory {}", dir.display()));
            }
            Err(e) => {
                warn!("walk error: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!("skipping non-UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if !scan.include_hidden && name.starts_with('.') {
            continue;
        }
        if excludes.is_match(name) {
            debug!("excluded {name}");
            continue;
        }
        let lower = name.to_lowercase();
        if suffixes.iter().any(|s| lower.ends_with(s.as_str())) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Last-modified instant of `dir/name`.
pub fn modified_time(dir: &Path, name: &str) -> std::io::Result<SystemTime> {
    dir.join(name).metadata()?.modified()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).with_context(|| format!("invalid exclude pattern {pat:?}"))?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), name).unwrap();
    }

    #[test]
    fn test_lists_only_accepted_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["202314002.c", "202314001.txt", "hw1_final.TXT", "notes.docx", "Makefile", "a.pdf"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();
        touch(&dir.path().join("nested.txt"), "202314009.txt");

        let names = list_submissions(dir.path(), &ScanConfig::default(), &NamingConfig::default()).unwrap();
        assert_eq!(names, vec!["202314001.txt", "202314002.c", "a.pdf", "hw1_final.TXT"]);
    }

    #[test]
    fn test_hidden_and_excluded() {
        let dir = tempfile::tempdir().unwrap();
        for name in &[".202314001.txt", "202314002.txt", "draft_202314003.txt"] {
            touch(dir.path(), name);
        }
        let naming = NamingConfig::default();

        let all = list_submissions(dir.path(), &ScanConfig::default(), &naming).unwrap();
        assert_eq!(all.len(), 3);

        let scan = ScanConfig {
            exclude: vec!["draft_*".into()],
            include_hidden: false,
        };
        assert_eq!(list_submissions(dir.path(), &scan, &naming).unwrap(), vec!["202314002.txt"]);
    }

    #[test]
    fn test_missing_directory_fails() {
        let err = list_submissions(
            Path::new("/nonexistent/submissions"),
            &ScanConfig::default(),
            &NamingConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_invalid_exclude_pattern_fails() {
        let dir = tempfile::tempdir().unwrap();
        let scan = ScanConfig {
            exclude: vec!["[".into()],
            include_hidden: true,
        };
        assert!(list_submissions(dir.path(), &scan, &NamingConfig::default()).is_err());
    }

    #[test]
    fn test_modified_time_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(modified_time(dir.path(), "202314001.txt").is_err());
        touch(dir.path(), "202314001.txt");
        assert!(modified_time(dir.path(), "202314001.txt").is_ok());
    }
}
