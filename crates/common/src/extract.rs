use std::path::Path;

use crate::api::Extraction;

/// Turns a submission file into comparable text.
///
/// `extension` is the lower-cased suffix already derived by the caller, so
/// implementations route on it rather than re-inspecting the path.
pub trait Extractor {
    fn extract(&self, path: &Path, extension: &str) -> Extraction;
}
