//! Final score and selection verdict.
//!
//! final = skills × 0.4 + similarity × 0.4 + experience_component × 0.2
//!
//! Selected only when every gate holds: experience ≥ minimum, final ≥ minimum,
//! skills > 30 and similarity ≥ 5. The two fixed floors stop experience alone from
//! carrying a candidate over the line.

use std::collections::BTreeSet;

use crate::models::{Decision, JobCriteria, ScoreRecord};

use super::normalize::round2;

pub const SKILLS_WEIGHT: f64 = 0.4;
pub const SIMILARITY_WEIGHT: f64 = 0.4;
pub const EXPERIENCE_WEIGHT: f64 = 0.2;

/// Strictly greater than.
pub const SKILLS_FLOOR: f64 = 30.0;
pub const SIMILARITY_FLOOR: f64 = 5.0;

/// Builds the record with empty skill sets; see [`decide_with_skills`] to carry them.
pub fn decide(
    experience: f64,
    skills_score: f64,
    similarity_scaled: f64,
    criteria: &JobCriteria,
) -> ScoreRecord {
    decide_with_skills(
        experience,
        skills_score,
        similarity_scaled,
        criteria,
        BTreeSet::new(),
        BTreeSet::new(),
    )
}

pub fn decide_with_skills(
    experience: f64,
    skills_score: f64,
    similarity_scaled: f64,
    criteria: &JobCriteria,
    matched_skills: BTreeSet<String>,
    missing_skills: BTreeSet<String>,
) -> ScoreRecord {
    let experience_component = experience_component(experience, criteria.min_experience_years);

    let final_score = round2(
        (skills_score * SKILLS_WEIGHT
            + similarity_scaled * SIMILARITY_WEIGHT
            + experience_component * EXPERIENCE_WEIGHT)
            .clamp(0.0, 100.0),
    );

    let selected = experience >= criteria.min_experience_years
        && final_score >= f64::from(criteria.min_final_score)
        && skills_score > SKILLS_FLOOR
        && similarity_scaled >= SIMILARITY_FLOOR;

    ScoreRecord {
        experience,
        skills_score,
        similarity_score: similarity_scaled,
        experience_component: round2(experience_component),
        final_score,
        matched_skills,
        missing_skills,
        decision: if selected {
            Decision::Selected
        } else {
            Decision::Rejected
        },
    }
}

/// 0 – 100. Zero when the job sets no experience minimum.
fn experience_component(experience: f64, min_years: f64) -> f64 {
    if min_years > 0.0 {
        (experience / min_years).min(1.0).max(0.0) * 100.0
    } else {
        0.0
    }
}
