//! OCR tier for scanned PDFs.
//!
//! Pages are rasterized with Poppler's `pdftoppm` into a scratch directory and each
//! image is passed to the `tesseract` CLI. Both are CPU-heavy (seconds per page) and are
//! only reached when both text layers came back too short.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use super::{ExtractError, OcrConfig};

/// Rasterizes every page of `pdf` and returns the concatenated OCR text.
/// A page that fails recognition is skipped; failing to rasterize at all is an error.
pub fn recognize_pdf(pdf: &Path, config: &OcrConfig) -> Result<String, ExtractError> {
    let scratch = tempfile::tempdir()?;
    let prefix = scratch.path().join("page");
    rasterize(pdf, &prefix, config)?;

    let pages = rendered_pages(scratch.path())?;
    debug!(path = %pdf.display(), pages = pages.len(), "Rasterized PDF for OCR");

    let mut text = String::new();
    for page in &pages {
        match recognize_image(page, config) {
            Ok(content) if !content.trim().is_empty() => {
                text.push_str(content.trim_end());
                text.push('\n');
            }
            Ok(_) => {}
            Err(e) => warn!(page = %page.display(), error = %e, "OCR failed for page; skipping"),
        }
    }
    Ok(text.trim().to_string())
}

fn rasterize(pdf: &Path, prefix: &Path, config: &OcrConfig) -> Result<(), ExtractError> {
    let output = Command::new(&config.pdftoppm_path)
        .arg("-r")
        .arg(config.dpi.to_string())
        .arg("-png")
        .arg(pdf)
        .arg(prefix)
        .output()
        .map_err(|e| {
            ExtractError::Ocr(format!("failed to launch '{}': {e}", config.pdftoppm_path))
        })?;

    if !output.status.success() {
        return Err(ExtractError::Ocr(format!(
            "'{}' exited with {}: {}",
            config.pdftoppm_path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// pdftoppm zero-pads page numbers, so lexical order is page order.
fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut pages: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    pages.sort();
    Ok(pages)
}

fn recognize_image(image: &Path, config: &OcrConfig) -> Result<String, ExtractError> {
    let output = Command::new(&config.tesseract_path)
        .arg(image)
        .arg("stdout")
        .arg("-l")
        .arg(&config.lang)
        .output()
        .map_err(|e| {
            ExtractError::Ocr(format!("failed to launch '{}': {e}", config.tesseract_path))
        })?;

    if !output.status.success() {
        return Err(ExtractError::Ocr(format!(
            "'{}' exited with {}: {}",
            config.tesseract_path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_pages_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let pages = rendered_pages(dir.path()).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[test]
    fn test_missing_rasterizer_reports_ocr_error() {
        let config = OcrConfig {
            pdftoppm_path: "/nonexistent/pdftoppm-for-tests".to_string(),
            ..OcrConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let err = rasterize(Path::new("in.pdf"), &dir.path().join("page"), &config).unwrap_err();
        assert!(err.to_string().contains("failed to launch"), "got: {err}");
    }

    #[test]
    fn test_missing_tesseract_reports_ocr_error() {
        let config = OcrConfig {
            tesseract_path: "/nonexistent/tesseract-for-tests".to_string(),
            ..OcrConfig::default()
        };
        let err = recognize_image(Path::new("page-1.png"), &config).unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
    }
}
