//! PDF extraction in three tiers, each tried only when the previous one came back too short.
//!
//! 1. `pdf-extract` over the whole document (fast text layer)
//! 2. `lopdf` page by page, skipping pages that fail to decode (thorough text layer)
//! 3. rasterize every page and OCR it (scanned / image-only PDFs)
//!
//! OCR never makes things worse: when it fails or recognizes nothing, the longer of the
//! two text layers is returned instead, even if it is below the threshold.

use std::path::Path;

use tracing::{debug, warn};

use super::{guard_panic, ocr, ExtractError, OcrConfig};

/// A text layer at or below this many characters is treated as missing.
pub const MIN_VIABLE_CHARS: usize = 300;

pub fn extract_pdf(path: &Path, ocr_config: &OcrConfig) -> Result<String, ExtractError> {
    let fast = read_text_layer(path).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "Fast PDF text layer failed");
        String::new()
    });
    if is_viable(&fast) {
        return Ok(fast);
    }

    debug!(
        path = %path.display(),
        chars = fast.chars().count(),
        "Fast text layer below threshold; reading pages individually"
    );
    let thorough = read_pages(path).unwrap_or_else(|e| {
        debug!(path = %path.display(), error = %e, "Per-page PDF text layer failed");
        String::new()
    });
    if is_viable(&thorough) {
        return Ok(thorough);
    }

    let best_layer = longest(fast, thorough);
    if !ocr_config.enabled {
        debug!(path = %path.display(), "OCR disabled; keeping best text layer");
        return Ok(best_layer);
    }

    debug!(
        path = %path.display(),
        chars = best_layer.chars().count(),
        dpi = ocr_config.dpi,
        "Text layers below threshold; falling back to OCR"
    );
    match ocr::recognize_pdf(path, ocr_config) {
        Ok(recognized) if !recognized.is_empty() => Ok(recognized),
        Ok(_) => {
            debug!(path = %path.display(), "OCR recognized nothing; keeping best text layer");
            Ok(best_layer)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "OCR failed; keeping best text layer");
            Ok(best_layer)
        }
    }
}

fn is_viable(text: &str) -> bool {
    text.chars().count() > MIN_VIABLE_CHARS
}

fn longest(a: String, b: String) -> String {
    if b.chars().count() > a.chars().count() {
        b
    } else {
        a
    }
}

fn read_text_layer(path: &Path) -> Result<String, ExtractError> {
    guard_panic("pdf-extract", || {
        pdf_extract::extract_text(path)
            .map(|text| text.trim().to_string())
            .map_err(|e| ExtractError::Pdf(e.to_string()))
    })
}

fn read_pages(path: &Path) -> Result<String, ExtractError> {
    guard_panic("lopdf", || {
        let document =
            lopdf::Document::load(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let mut text = String::new();
        for page_number in document.get_pages().keys() {
            match document.extract_text(&[*page_number]) {
                Ok(content) if !content.trim().is_empty() => {
                    text.push_str(content.trim_end());
                    text.push('\n');
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(page = page_number, error = %e, "Skipping unreadable PDF page");
                }
            }
        }
        Ok(text.trim().to_string())
    })
}
