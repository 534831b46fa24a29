use std::path::PathBuf;

use tracing::debug;

use handin_common::api::{extension_of, SimilarityPair};
use handin_common::extract::Extractor;
use handin_common::matcher;

use crate::lazy_header;

/// Group names by lower-cased extension, groups in first-seen order and
/// names in input order within each group.
pub fn group_by_extension(names: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for name in names {
        let ext = extension_of(name);
        match groups.iter_mut().find(|(e, _)| *e == ext) {
            Some((_, members)) => members.push(name.clone()),
            None => groups.push((ext, vec![name.clone()])),
        }
    }
    groups
}

/// Pairwise similarity within extension groups.
pub struct Analyzer<'e> {
    extractor: &'e dyn Extractor,
    dir: PathBuf,
    autojunk: bool,
}

impl<'e> Analyzer<'e> {
    pub fn new(extractor: &'e dyn Extractor, dir: impl Into<PathBuf>, autojunk: bool) -> Self {
        Self { extractor, dir: dir.into(), autojunk }
    }

    /// Score every unordered pair `(i, j)`, `i < j`, inside each extension
    /// group. Files are never compared across groups. Each file's text is
    /// extracted once; a failed extraction is logged and compared as `""`.
    pub fn analyze(&self, valid: &[String]) -> Vec<SimilarityPair> {
        let mut pairs = Vec::new();

        for (ext, group) in group_by_extension(valid) {
            if group.len() < 2 {
                debug!("group .{ext}: single file, nothing to compare");
                continue;
            }
            let texts: Vec<String> = group.iter().map(|name| self.text_of(name, &ext)).collect();
            debug!("group .{ext}: {} files, {} pairs", group.len(), group.len() * (group.len() - 1) / 2);

            for i in 0..group.len() {
                for j in (i + 1)..group.len() {
                    pairs.push(SimilarityPair {
                        first: group[i].clone(),
                        second: group[j].clone(),
                        score: matcher::similarity(&texts[i], &texts[j], self.autojunk),
                    });
                }
            }
        }

        pairs
    }

    fn text_of(&self, name: &str, ext: &str) -> String {
        let path = self.dir.join(name);
        let display = path.display().to_string();
        lazy_header::set_pending(&display);
        let extraction = self.extractor.extract(&path, ext);
        lazy_header::clear_pending();
        handin_extract_dispatch::absorb(&path, extraction)
    }
}
