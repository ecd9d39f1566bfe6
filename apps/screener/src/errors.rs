use thiserror::Error;

/// Crate-level error type.
///
/// The scoring engine itself never surfaces these: extraction and analysis degrade to
/// empty/zero results. `ScreenError` covers the edges around it (criteria validation,
/// bundle intake, driver I/O).
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Intake rejected: {0}")]
    Intake(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<zip::result::ZipError> for ScreenError {
    fn from(err: zip::result::ZipError) -> Self {
        ScreenError::Intake(format!("Invalid or corrupted ZIP file: {err}"))
    }
}
