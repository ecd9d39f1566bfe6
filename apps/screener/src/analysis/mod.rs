//! Scoring of extracted text: experience, skills, JD similarity and the final decision.
//!
//! Every function here is pure and infallible; degenerate input yields a documented zero.

pub mod decision;
pub mod experience;
pub mod normalize;
pub mod similarity;
pub mod skill_tables;
pub mod skills;

pub use decision::{decide, decide_with_skills};
pub use experience::extract_experience;
pub use similarity::{jd_resume_similarity, SimilarityResult};
pub use skills::{calculate_skill_score, MatchReason, SkillAssessment, SkillDetail};
