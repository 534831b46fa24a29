use std::path::Path;

use handin_common::api::ExtractError;
use tracing::debug;

/// Extract the full text of a plain-text or source file.
///
/// The bytes are decoded as UTF-8 with undecodable sequences dropped, and
/// `\r\n` / lone `\r` line endings are read as `\n`. Nothing else is
/// normalised: whitespace, case and comments all survive.
///
/// # Errors
/// Only I/O failures; decoding never fails.
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if content_inspector::inspect(&bytes).is_binary() {
        debug!("{} looks binary; comparing its decodable text anyway", path.display());
    }

    Ok(extract_from_bytes(&bytes))
}

/// Decode in-memory bytes the same way [`extract`] decodes a file.
pub fn extract_from_bytes(bytes: &[u8]) -> String {
    translate_newlines(decode_dropping_invalid(bytes))
}

/// UTF-8 decode, silently skipping every invalid byte sequence.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

fn translate_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Extensions read as plain text. Wider than the default naming extensions so
/// a config that accepts other source languages still gets them compared.
pub fn is_text_ext(ext: &str) -> bool {
    matches!(
        ext.to_lowercase().as_str(),
        "txt" | "text" | "md" | "rst" | "csv" | "log"
        | "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hh"
        | "l" | "lex" | "y" | "yacc"
        | "java" | "py" | "rs" | "go" | "js" | "ts" | "cs" | "kt" | "swift"
        | "sh" | "asm" | "s" | "sql" | "hs" | "ml"
    )
}
