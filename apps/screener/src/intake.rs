//! Intake: turns command-line inputs (loose files and `.zip` bundles) into validated
//! local candidate files for the engine.
//!
//! Bundle checks, in order:
//! 1. non-empty and at most `max_bundle_bytes` on disk
//! 2. readable ZIP with at most `max_files` entries
//! 3. summed declared entry sizes at most `max_inflated_bytes`
//! 4. every entry path stays inside the unpack directory
//! 5. entries that resolve to an already-seen path are skipped (first one wins)
//! 6. actual inflated bytes are capped while copying (declared sizes can lie)
//!
//! Only `.pdf`, `.docx` and `.txt` entries are unpacked. A bundle that fails any check is
//! logged and skipped; the remaining inputs still go through.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::errors::ScreenError;
use crate::extraction::DocumentFormat;

const MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeLimits {
    pub max_bundle_bytes: u64,
    pub max_inflated_bytes: u64,
    /// Per-bundle entry ceiling and overall document cap.
    pub max_files: usize,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            max_bundle_bytes: 50 * MB,
            max_inflated_bytes: 50 * MB,
            max_files: 50,
        }
    }
}

/// A validated local file plus its declared format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

impl CandidateFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Some(Self { path, format })
    }
}

/// Candidate files ready for screening. Unpacked bundle contents live in scratch
/// directories owned by this value and are removed when it is dropped.
#[derive(Debug, Default)]
pub struct Intake {
    files: Vec<CandidateFile>,
    _scratch: Vec<TempDir>,
}

impl Intake {
    pub fn files(&self) -> &[CandidateFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn is_bundle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Collects candidate files from `inputs` in order. Bundles are unpacked in place of
/// their path. The result is capped at `limits.max_files`.
pub fn collect_inputs(inputs: &[PathBuf], limits: &IntakeLimits) -> Intake {
    let mut intake = Intake::default();

    for input in inputs {
        if !input.is_file() {
            warn!(path = %input.display(), "Input is not a readable file; skipping");
            continue;
        }

        if is_bundle(input) {
            match unpack_bundle(input, limits) {
                Ok((dir, files)) => {
                    info!(path = %input.display(), files = files.len(), "Unpacked bundle");
                    intake.files.extend(files);
                    intake._scratch.push(dir);
                }
                Err(e) => warn!(path = %input.display(), error = %e, "Bundle rejected"),
            }
            continue;
        }

        match CandidateFile::from_path(input) {
            Some(file) => intake.files.push(file),
            None => warn!(path = %input.display(), "Unsupported file type; skipping"),
        }
    }

    if intake.files.len() > limits.max_files {
        warn!(
            found = intake.files.len(),
            max = limits.max_files,
            "Too many documents; dropping the excess"
        );
        intake.files.truncate(limits.max_files);
    }
    intake
}

/// Validates `bundle` and unpacks its supported entries into a fresh scratch directory.
pub fn unpack_bundle(
    bundle: &Path,
    limits: &IntakeLimits,
) -> Result<(TempDir, Vec<CandidateFile>), ScreenError> {
    let size = fs::metadata(bundle)?.len();
    if size == 0 {
        return Err(ScreenError::Intake("Empty ZIP file".to_string()));
    }
    if size > limits.max_bundle_bytes {
        return Err(ScreenError::Intake(format!(
            "ZIP file size {size} bytes exceeds the limit of {} bytes",
            limits.max_bundle_bytes
        )));
    }

    let mut archive = ZipArchive::new(File::open(bundle)?)?;
    if archive.len() > limits.max_files {
        return Err(ScreenError::Intake(format!(
            "Too many files in ZIP ({}); maximum allowed is {}",
            archive.len(),
            limits.max_files
        )));
    }

    // Validate every entry before writing anything.
    let mut declared: u64 = 0;
    let mut entries: Vec<(usize, PathBuf, DocumentFormat)> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for idx in 0..archive.len() {
        let entry = archive.by_index_raw(idx)?;
        declared = declared.saturating_add(entry.size());

        let relative = entry.enclosed_name().ok_or_else(|| {
            ScreenError::Intake(format!(
                "Unsafe ZIP entry '{}' (path traversal)",
                entry.name()
            ))
        })?;
        if entry.is_dir() {
            continue;
        }
        let Some(format) = DocumentFormat::from_path(&relative) else {
            debug!(entry = entry.name(), "Skipping unsupported bundle entry");
            continue;
        };
        let relative = resolve_entry_path(&relative);
        if !seen.insert(relative.clone()) {
            warn!(entry = entry.name(), "Skipping duplicate bundle entry");
            continue;
        }
        entries.push((idx, relative, format));
    }

    if declared > limits.max_inflated_bytes {
        return Err(ScreenError::Intake(format!(
            "ZIP bomb detected: declared inflated size {declared} bytes exceeds {} bytes",
            limits.max_inflated_bytes
        )));
    }
    if entries.is_empty() {
        return Err(ScreenError::Intake(
            "No valid resume files found (.pdf, .docx, .txt)".to_string(),
        ));
    }

    let dir = tempfile::Builder::new().prefix("screener-bundle-").tempdir()?;
    let mut budget = limits.max_inflated_bytes;
    let mut files = Vec::with_capacity(entries.len());

    for (idx, relative, format) in entries {
        let target = dir.path().join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let entry = archive.by_index(idx)?;
        let mut out = File::create(&target)?;
        let written = io::copy(&mut entry.take(budget.saturating_add(1)), &mut out)?;
        if written > budget {
            return Err(ScreenError::Intake(format!(
                "ZIP bomb detected: inflated data exceeds {} bytes",
                limits.max_inflated_bytes
            )));
        }
        budget -= written;

        files.push(CandidateFile {
            path: target,
            format,
        });
    }

    Ok((dir, files))
}

/// Folds `.` and `..` so that every spelling of one location maps to one path.
/// Only called on names that already passed `enclosed_name`.
fn resolve_entry_path(relative: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    resolved
}
