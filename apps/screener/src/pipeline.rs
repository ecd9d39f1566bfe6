//! Per-document screening pipeline and the parallel batch runner.
//!
//! Pipeline for one file:
//! 1. Extract text (never fails; "" means extraction failed → `Pending`).
//! 2. Experience, skills and JD similarity, each behind its own fault boundary.
//! 3. Decision → `ScoreRecord` → `ScreeningOutcome`.
//!
//! # Batch
//! Documents share nothing mutable. Each one runs on the blocking pool (extraction and
//! OCR are CPU/IO bound) with a semaphore capping how many run at once. A task that dies
//! becomes a `Pending` outcome for its own file only.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::{
    calculate_skill_score, decide_with_skills, extract_experience, jd_resume_similarity,
    SimilarityResult, SkillAssessment, SkillDetail,
};
use crate::extraction::{DocumentFormat, OcrConfig, TextExtractor};
use crate::intake::CandidateFile;
use crate::models::{JobCriteria, ScoreRecord, ScreeningOutcome, ScreeningStatus};

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Scores documents against one locked set of criteria. Cheap to clone; clones share
/// the criteria.
#[derive(Debug, Clone)]
pub struct ScreeningEngine {
    extractor: TextExtractor,
    criteria: Arc<JobCriteria>,
}

impl ScreeningEngine {
    pub fn new(criteria: JobCriteria, ocr: OcrConfig) -> Self {
        Self {
            extractor: TextExtractor::new(ocr),
            criteria: Arc::new(criteria),
        }
    }

    pub fn criteria(&self) -> &JobCriteria {
        &self.criteria
    }

    /// Runs the three analyses on already-extracted text and combines them.
    pub fn score_text(&self, text: &str) -> ScoreRecord {
        self.assess_text(text).0
    }

    /// Like [`Self::score_text`], also returning the per-skill audit trail.
    pub fn assess_text(&self, text: &str) -> (ScoreRecord, BTreeMap<String, SkillDetail>) {
        let criteria = &self.criteria;

        let experience = guarded("experience", || 0.0, || extract_experience(text));
        let skills = guarded(
            "skills",
            || SkillAssessment::zero(&criteria.required_skills),
            || calculate_skill_score(text, &criteria.required_skills),
        );
        let similarity = guarded("similarity", SimilarityResult::default, || {
            jd_resume_similarity(&criteria.job_description, text)
        });

        let record = decide_with_skills(
            experience,
            skills.score,
            similarity.scaled_score,
            criteria,
            skills.matched,
            skills.missing,
        );
        (record, skills.details)
    }

    /// Extracts and scores one file. Empty extraction yields a `Pending` outcome with a
    /// zeroed record.
    pub fn screen_document(&self, path: &Path, format: DocumentFormat) -> ScreeningOutcome {
        let document = self.extractor.extract_document(path, format);
        if document.is_empty() {
            warn!(path = %path.display(), ?format, "No text extracted; marking pending");
            return ScreeningOutcome::pending(
                document.source_path,
                Some(format),
                &self.criteria.required_skills,
            );
        }

        let (record, skill_details) = self.assess_text(&document.raw_text);
        debug!(
            path = %path.display(),
            final_score = record.final_score,
            decision = ?record.decision,
            "Scored document"
        );

        ScreeningOutcome {
            source_path: document.source_path,
            format: Some(format),
            status: record.decision.into(),
            extracted_chars: document.raw_text.chars().count(),
            extracted_text: document.raw_text,
            record,
            skill_details,
            processed_at: Utc::now(),
        }
    }
}

/// Runs one sub-scorer; a panic is logged and replaced by the scorer's zero value.
fn guarded<T>(stage: &'static str, fallback: impl FnOnce() -> T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            warn!(stage, "Scorer fault; using zero result");
            fallback()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Batch
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub total: usize,
    pub selected: usize,
    pub rejected: usize,
    pub pending: usize,
}

impl BatchSummary {
    fn tally(batch_id: Uuid, outcomes: &[ScreeningOutcome]) -> Self {
        let count = |status: ScreeningStatus| {
            outcomes.iter().filter(|o| o.status == status).count()
        };
        Self {
            batch_id,
            total: outcomes.len(),
            selected: count(ScreeningStatus::Selected),
            rejected: count(ScreeningStatus::Rejected),
            pending: count(ScreeningStatus::Pending),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub summary: BatchSummary,
    /// Same order as the input files.
    pub outcomes: Vec<ScreeningOutcome>,
}

/// Screens `files` with at most `workers` documents in flight.
pub async fn screen_batch(
    engine: ScreeningEngine,
    files: Vec<CandidateFile>,
    workers: usize,
) -> BatchReport {
    let batch_id = Uuid::new_v4();
    let sem = Arc::new(Semaphore::new(workers.max(1)));
    info!(%batch_id, files = files.len(), workers = workers.max(1), "Screening batch");

    let mut join_set = JoinSet::new();
    for (idx, file) in files.iter().cloned().enumerate() {
        let engine = engine.clone();
        let sem = Arc::clone(&sem);
        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            let outcome = tokio::task::spawn_blocking(move || {
                engine.screen_document(&file.path, file.format)
            })
            .await;
            (idx, outcome)
        });
    }

    let mut slots: Vec<Option<ScreeningOutcome>> = vec![None; files.len()];
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, Ok(outcome))) => slots[idx] = Some(outcome),
            Ok((idx, Err(e))) => {
                warn!(path = %files[idx].path.display(), error = %e, "Screening task failed");
            }
            Err(e) => warn!(error = %e, "Screening task join error"),
        }
    }

    // Anything without a result crashed; it stays with its file as Pending.
    let outcomes: Vec<ScreeningOutcome> = files
        .into_iter()
        .zip(slots)
        .map(|(file, slot)| {
            slot.unwrap_or_else(|| {
                ScreeningOutcome::pending(
                    file.path,
                    Some(file.format),
                    &engine.criteria().required_skills,
                )
            })
        })
        .collect();

    let summary = BatchSummary::tally(batch_id, &outcomes);
    debug!(
        %batch_id,
        total = summary.total,
        selected = summary.selected,
        rejected = summary.rejected,
        pending = summary.pending,
        "Batch complete"
    );

    BatchReport { summary, outcomes }
}
