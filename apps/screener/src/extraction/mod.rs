//! Text extraction: turns a candidate file into plain text.
//!
//! Strategy per format (cheapest reliable method first):
//! - PDF: pdf-extract text layer → lopdf per-page text layer → rasterize + tesseract OCR
//! - DOCX: body paragraphs in order, then top-level table rows as `cell | cell`
//! - TXT: UTF-8 → Latin-1 → Windows-1252
//!
//! `TextExtractor::extract` never fails. Every strategy error (and any panic inside a
//! third-party parser) is logged and turned into an empty string, which downstream
//! stages read as "extraction failed".

pub mod docx;
pub mod ocr;
pub mod pdf;
pub mod txt;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ExtractedDocument;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("{0} panicked: {1}")]
    Panicked(&'static str, String),
}

/// Supported candidate document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Case-insensitive extension lookup. `None` for anything unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" => Some(DocumentFormat::Txt),
            _ => None,
        }
    }
}

/// External OCR tooling used by the last PDF tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub enabled: bool,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub dpi: u32,
    pub lang: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            dpi: 300,
            lang: "eng".to_string(),
        }
    }
}

/// Format-dispatching extractor. Holds only read-only configuration, so one instance
/// can be shared by every worker.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    ocr: OcrConfig,
}

impl TextExtractor {
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }

    /// Extracts trimmed text from `path` as `format`. Empty string on any failure.
    pub fn extract(&self, path: &Path, format: DocumentFormat) -> String {
        let result = match format {
            DocumentFormat::Pdf => pdf::extract_pdf(path, &self.ocr),
            DocumentFormat::Docx => docx::extract_docx(path),
            DocumentFormat::Txt => txt::extract_txt(path),
        };

        match result {
            Ok(text) => {
                let text = text.trim().to_string();
                debug!(path = %path.display(), ?format, chars = text.chars().count(), "Extracted text");
                text
            }
            Err(e) => {
                warn!(path = %path.display(), ?format, error = %e, "Text extraction failed");
                String::new()
            }
        }
    }

    /// Infers the format from the extension. Missing files and unknown extensions yield "".
    pub fn extract_path(&self, path: &Path) -> String {
        if !path.is_file() {
            warn!(path = %path.display(), "Input file does not exist");
            return String::new();
        }
        match DocumentFormat::from_path(path) {
            Some(format) => self.extract(path, format),
            None => {
                warn!(path = %path.display(), "Unsupported file extension");
                String::new()
            }
        }
    }

    pub fn extract_document(&self, path: &Path, format: DocumentFormat) -> ExtractedDocument {
        ExtractedDocument {
            source_path: path.to_path_buf(),
            raw_text: self.extract(path, format),
            format,
        }
    }
}

/// Runs a strategy that may panic inside a third-party parser, converting the panic
/// into `ExtractError::Panicked`.
pub(crate) fn guard_panic<T>(
    label: &'static str,
    f: impl FnOnce() -> Result<T, ExtractError>,
) -> Result<T, ExtractError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ExtractError::Panicked(label, message))
        }
    }
}
