use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::SkillDetail;
use crate::extraction::DocumentFormat;

/// Text pulled out of one input file. `raw_text` is empty when extraction failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source_path: PathBuf,
    pub raw_text: String,
    pub format: DocumentFormat,
}

impl ExtractedDocument {
    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

/// Binary verdict emitted by the decision scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Selected,
    Rejected,
}

/// Engine output for one document. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Years, 2 decimals.
    pub experience: f64,
    /// 0 – 100
    pub skills_score: f64,
    /// 0 – 100
    pub similarity_score: f64,
    /// 0 – 100
    pub experience_component: f64,
    /// 0 – 100
    pub final_score: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub decision: Decision,
}

impl ScoreRecord {
    /// Placeholder for a document whose pipeline produced nothing usable.
    /// Every required skill is reported missing.
    pub fn zeroed(required_skills: &[String]) -> Self {
        Self {
            experience: 0.0,
            skills_score: 0.0,
            similarity_score: 0.0,
            experience_component: 0.0,
            final_score: 0.0,
            matched_skills: BTreeSet::new(),
            missing_skills: required_skills
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            decision: Decision::Rejected,
        }
    }
}

/// Status the caller persists. `Pending` marks a document that needs manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningStatus {
    Selected,
    Rejected,
    Pending,
}

impl From<Decision> for ScreeningStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Selected => ScreeningStatus::Selected,
            Decision::Rejected => ScreeningStatus::Rejected,
        }
    }
}

/// Per-file result handed to the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub source_path: PathBuf,
    pub format: Option<DocumentFormat>,
    pub status: ScreeningStatus,
    pub extracted_chars: usize,
    /// Text the scores were computed from; empty for `Pending`.
    pub extracted_text: String,
    pub record: ScoreRecord,
    /// Why each required skill matched or not, keyed by its lower-cased form.
    pub skill_details: BTreeMap<String, SkillDetail>,
    pub processed_at: DateTime<Utc>,
}

impl ScreeningOutcome {
    pub fn pending(
        source_path: PathBuf,
        format: Option<DocumentFormat>,
        required_skills: &[String],
    ) -> Self {
        Self {
            source_path,
            format,
            status: ScreeningStatus::Pending,
            extracted_chars: 0,
            extracted_text: String::new(),
            record: ScoreRecord::zeroed(required_skills),
            skill_details: BTreeMap::new(),
            processed_at: Utc::now(),
        }
    }
}
