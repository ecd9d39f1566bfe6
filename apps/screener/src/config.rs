use anyhow::{Context, Result};
use std::str::FromStr;

use crate::extraction::OcrConfig;
use crate::intake::IntakeLimits;

/// Runtime configuration loaded from environment variables.
/// Every value has a default; only malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub workers: usize,
    pub ocr_enabled: bool,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub ocr_dpi: u32,
    pub ocr_lang: String,
    pub max_bundle_mb: u64,
    pub max_inflated_mb: u64,
    pub max_bundle_files: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            workers: parse_env("SCREENER_WORKERS", default_workers())?.max(1),
            ocr_enabled: parse_env("SCREENER_OCR_ENABLED", true)?,
            pdftoppm_path: env_or("SCREENER_PDFTOPPM_PATH", "pdftoppm"),
            tesseract_path: env_or("SCREENER_TESSERACT_PATH", "tesseract"),
            ocr_dpi: parse_env("SCREENER_OCR_DPI", 300)?,
            ocr_lang: env_or("SCREENER_OCR_LANG", "eng"),
            max_bundle_mb: parse_env("SCREENER_MAX_BUNDLE_MB", 50)?,
            max_inflated_mb: parse_env("SCREENER_MAX_INFLATED_MB", 50)?,
            max_bundle_files: parse_env("SCREENER_MAX_BUNDLE_FILES", 50)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig {
            enabled: self.ocr_enabled,
            pdftoppm_path: self.pdftoppm_path.clone(),
            tesseract_path: self.tesseract_path.clone(),
            dpi: self.ocr_dpi,
            lang: self.ocr_lang.clone(),
        }
    }

    pub fn intake_limits(&self) -> IntakeLimits {
        IntakeLimits {
            max_bundle_bytes: self.max_bundle_mb.saturating_mul(BYTES_PER_MB),
            max_inflated_bytes: self.max_inflated_mb.saturating_mul(BYTES_PER_MB),
            max_files: self.max_bundle_files,
        }
    }
}

const BYTES_PER_MB: u64 = 1024 * 1024;

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("SCREENER_TEST_SURELY_UNSET_VAR", 300).unwrap();
        assert_eq!(value, 300);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCREENER_TEST_BAD_DPI", "three hundred");
        let result: Result<u32> = parse_env("SCREENER_TEST_BAD_DPI", 300);
        std::env::remove_var("SCREENER_TEST_BAD_DPI");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("SCREENER_TEST_BAD_DPI"), "got: {err}");
    }

    fn config_with_limits(bundle_mb: u64, inflated_mb: u64) -> Config {
        Config {
            workers: 2,
            ocr_enabled: false,
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            ocr_dpi: 300,
            ocr_lang: "eng".to_string(),
            max_bundle_mb: bundle_mb,
            max_inflated_mb: inflated_mb,
            max_bundle_files: 7,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_intake_limits_convert_megabytes() {
        let config = config_with_limits(2, 3);
        let limits = config.intake_limits();
        assert_eq!(limits.max_bundle_bytes, 2 * 1024 * 1024);
        assert_eq!(limits.max_inflated_bytes, 3 * 1024 * 1024);
        assert_eq!(limits.max_files, 7);
        assert!(!config.ocr_config().enabled);
    }

    #[test]
    fn test_intake_limits_saturate_on_huge_values() {
        let limits = config_with_limits(u64::MAX, u64::MAX / 2).intake_limits();
        assert_eq!(limits.max_bundle_bytes, u64::MAX);
        assert_eq!(limits.max_inflated_bytes, u64::MAX);
    }
}
