use std::path::Path;

use handin_common::api::{ExtractError, Extraction};
use handin_common::extract::Extractor;
use tracing::{debug, warn};

/// Route a file to its extractor by (lower-cased) extension.
///
///   pdf → document extractor
///   text / source extensions → text extractor
///   anything else → `Unsupported`
///
/// Every file handle is opened and closed inside the extractor call.
pub fn dispatch_from_path(path: &Path, extension: &str) -> Extraction {
    let extension = extension.to_lowercase();

    if extension == "pdf" {
        return handin_extract_pdf::extract(path);
    }

    if handin_extract_text::is_text_ext(&extension) {
        return handin_extract_text::extract(path);
    }

    Err(ExtractError::Unsupported { extension })
}

/// Text of a submission, or `""` if it cannot be extracted.
///
/// A corrupt or unreadable file degrades to "no similarity signal" instead
/// of stopping the batch; the reason is logged.
pub fn extract_text(path: &Path, extension: &str) -> String {
    absorb(path, dispatch_from_path(path, extension))
}

/// Log an extraction failure and replace it with empty text.
pub fn absorb(path: &Path, extraction: Extraction) -> String {
    match extraction {
        Ok(text) => text,
        Err(e @ ExtractError::Unsupported { .. }) => {
            debug!("skipping {}: {e}", path.display());
            String::new()
        }
        Err(e) => {
            warn!("extract {}: {e}", path.display());
            String::new()
        }
    }
}

/// The extractor used for real runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DispatchExtractor;

impl Extractor for DispatchExtractor {
    fn extract(&self, path: &Path, extension: &str) -> Extraction {
        dispatch_from_path(path, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_files_go_to_text_extractor() {
        let dir = tempfile::tempdir().unwrap();
        for (name, ext) in &[("202314001.c", "c"), ("202314002.y", "y"), ("202314003.l", "l")] {
            let path = dir.path().join(name);
            std::fs::write(&path, "%%\nrule: ;\n").unwrap();
            assert_eq!(dispatch_from_path(&path, ext).unwrap(), "%%\nrule: ;\n");
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("202314001.CPP");
        std::fs::write(&path, "int main() {}").unwrap();
        assert_eq!(dispatch_from_path(&path, "CPP").unwrap(), "int main() {}");
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("202314001.docx");
        std::fs::write(&path, "PK").unwrap();
        assert!(matches!(
            dispatch_from_path(&path, "docx"),
            Err(ExtractError::Unsupported { .. })
        ));
        assert_eq!(extract_text(&path, "docx"), "");
    }

    #[test]
    fn test_failures_are_absorbed() {
        let missing = Path::new("/nonexistent/202314001.txt");
        assert_eq!(extract_text(missing, "txt"), "");

        let dir = tempfile::tempdir().unwrap();
        let corrupt = dir.path().join("202314001.pdf");
        std::fs::write(&corrupt, b"%PDF-garbage").unwrap();
        assert_eq!(extract_text(&corrupt, "pdf"), "");
    }

    #[test]
    fn test_extractor_trait_matches_free_function() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("202314001.txt");
        std::fs::write(&path, "hello").unwrap();
        assert_eq!(DispatchExtractor.extract(&path, "txt").unwrap(), "hello");
    }
}
