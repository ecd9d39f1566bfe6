//! Plain-text resumes: UTF-8 (BOM stripped), then strict Latin-1, then Windows-1252,
//! which always decodes.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

/// Tried in order; the first clean decode wins.
const ENCODINGS: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

impl TextEncoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(String::from)
            }
            // C1 controls almost never appear in real Latin-1 text; they are the
            // Windows-1252 punctuation range (smart quotes, dashes, bullets).
            TextEncoding::Latin1 => {
                if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
                    None
                } else {
                    Some(bytes.iter().map(|&b| char::from(b)).collect())
                }
            }
            TextEncoding::Windows1252 => {
                let (text, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                if had_errors {
                    debug!("Substituted undecodable bytes while reading Windows-1252 text");
                }
                Some(text.into_owned())
            }
        }
    }
}

pub fn extract_txt(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    Ok(decode_text(&bytes).trim().to_string())
}

pub(crate) fn decode_text(bytes: &[u8]) -> String {
    for encoding in ENCODINGS {
        if let Some(text) = encoding.decode(bytes) {
            debug!(?encoding, bytes = bytes.len(), "Decoded text file");
            return text;
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}
