use std::path::Path;

use handin_common::api::ExtractError;
use tracing::{error, warn};

/// Extract the text of a PDF, page by page, concatenated in page order.
///
/// Pages without extractable text contribute nothing. Malformed documents
/// are reported as errors, never as panics.
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_from_bytes(&bytes, path)
}

/// Extract text from PDF bytes. `path` is only used for error context.
pub fn extract_from_bytes(bytes: &[u8], path: &Path) -> Result<String, ExtractError> {
    // pdf-extract can panic on malformed PDFs; catch_unwind turns that into
    // an error so the batch continues with other files.
    //
    // The default hook prints no context about which file triggered the
    // panic, so a temporary one names it. The previous hook is restored.
    let name_for_hook = path.display().to_string();
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("pdf-extract panicked while processing {name_for_hook}: {info}");
    }));
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));
    std::panic::set_hook(prev_hook);

    match result {
        Ok(Ok(pages)) => Ok(join_pages(pages)),
        Ok(Err(e)) => {
            warn!("PDF extraction error for {}: {e}", path.display());
            Err(ExtractError::Document {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        Err(_) => Err(ExtractError::Panicked { path: path.to_path_buf() }),
    }
}

fn join_pages(pages: Vec<String>) -> String {
    pages.concat()
}
