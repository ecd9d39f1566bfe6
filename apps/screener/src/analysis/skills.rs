//! Skill Matcher: explainable, weighted scoring of required skills against resume text.
//!
//! Algorithm, per required skill (after lower-casing, trimming and de-duplication):
//! 1. Negative context ("no experience in <skill>", "avoid <skill>", ...) → confidence 0,
//!    nothing else is checked for that skill.
//! 2. Word-boundary match of the skill or one of its synonyms → confidence 0.7
//! 3. Otherwise fuzzy partial ratio of the skill against the text ≥ 85 → confidence 0.85
//! 4. Constituent words seen ≥ 3 times → +0.15, capped at 1.0
//! 5. contribution = round2(confidence × weight); matched iff confidence > 0
//!
//! score = Σ contribution / Σ weight × 100, rounded to 2 decimals.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalize::{normalize_text, round2, truncate_chars};
use super::skill_tables::{synonyms_for, weight_for};

pub const MAX_TEXT_CHARS: usize = 8000;

const EXACT_CONFIDENCE: f64 = 0.7;
const FUZZY_CONFIDENCE: f64 = 0.85;
const FUZZY_THRESHOLD: f64 = 85.0;
const FREQUENCY_BONUS: f64 = 0.15;
const FREQUENCY_MIN_COUNT: usize = 3;

const NEGATIVE_PATTERNS: &[&str] = &[
    r"no experience in\s+{}",
    r"not familiar with\s+{}",
    r"never worked on\s+{}",
    r"avoid\s+{}",
];

// ────────────────────────────────────────────────────────────────────────────
// Output models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    ExactMatch,
    SynonymMatch,
    FuzzyMatch,
    FrequencyOnly,
    NotFound,
    NegativeContext,
}

/// Audit trail for one required skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDetail {
    pub matched: bool,
    pub confidence: f64, // 0.0 – 1.0
    pub weight: f64,
    pub contribution: f64,
    pub reason: MatchReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_variant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub score: f64, // 0 – 100
    pub details: BTreeMap<String, SkillDetail>,
}

impl SkillAssessment {
    /// Nothing matched; every required skill is missing.
    pub fn zero(required_skills: &[String]) -> Self {
        Self {
            missing: unique_skills(required_skills).into_iter().collect(),
            ..Self::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores `required_skills` against `text`. Empty text or an empty skill list yields
/// [`SkillAssessment::zero`].
pub fn calculate_skill_score(text: &str, required_skills: &[String]) -> SkillAssessment {
    let skills = unique_skills(required_skills);
    let normalized = normalize_text(text);
    if normalized.is_empty() || skills.is_empty() {
        return SkillAssessment::zero(required_skills);
    }

    let text = truncate_chars(&normalized, MAX_TEXT_CHARS);
    let word_freq = word_frequencies(text);

    let mut assessment = SkillAssessment::default();
    let mut total_weight = 0.0;
    let mut achieved_weight = 0.0;

    for skill in skills {
        let weight = weight_for(&skill);
        total_weight += weight;

        let detail = assess_skill(text, &word_freq, &skill, weight);
        debug!(
            skill = %skill,
            reason = ?detail.reason,
            confidence = detail.confidence,
            "Assessed skill"
        );

        if detail.matched {
            achieved_weight += detail.contribution;
            assessment.matched.insert(skill.clone());
        } else {
            assessment.missing.insert(skill.clone());
        }
        assessment.details.insert(skill, detail);
    }

    let score = if total_weight > 0.0 {
        (achieved_weight / total_weight * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    assessment.score = round2(score);
    assessment
}

/// Lower-cased, trimmed, first-occurrence order, no duplicates, no blanks.
fn unique_skills(required_skills: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    required_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

fn word_frequencies(text: &str) -> HashMap<&str, usize> {
    let mut freq = HashMap::new();
    for word in text.split_whitespace() {
        *freq.entry(word).or_insert(0) += 1;
    }
    freq
}

fn assess_skill(
    text: &str,
    word_freq: &HashMap<&str, usize>,
    skill: &str,
    weight: f64,
) -> SkillDetail {
    let phrase = normalize_text(skill);
    if phrase.is_empty() {
        return unmatched(weight, MatchReason::NotFound);
    }

    if has_negative_context(text, &phrase) {
        return unmatched(weight, MatchReason::NegativeContext);
    }

    let mut confidence: f64 = 0.0;
    let mut reason = MatchReason::NotFound;
    let mut matched_variant = None;

    if contains_phrase(text, &phrase) {
        confidence = EXACT_CONFIDENCE;
        reason = MatchReason::ExactMatch;
        matched_variant = Some(phrase.clone());
    } else if let Some(variant) = find_synonym(text, skill) {
        confidence = EXACT_CONFIDENCE;
        reason = MatchReason::SynonymMatch;
        matched_variant = Some(variant);
    } else if partial_ratio(&phrase, text) >= FUZZY_THRESHOLD {
        confidence = FUZZY_CONFIDENCE;
        reason = MatchReason::FuzzyMatch;
    }

    let freq: usize = phrase
        .split_whitespace()
        .map(|word| word_freq.get(word).copied().unwrap_or(0))
        .sum();
    if freq >= FREQUENCY_MIN_COUNT {
        confidence = (confidence + FREQUENCY_BONUS).min(1.0);
        if reason == MatchReason::NotFound {
            reason = MatchReason::FrequencyOnly;
        }
    }

    SkillDetail {
        matched: confidence > 0.0,
        confidence: round2(confidence),
        weight,
        contribution: round2(confidence * weight),
        reason,
        matched_variant,
    }
}

fn unmatched(weight: f64, reason: MatchReason) -> SkillDetail {
    SkillDetail {
        matched: false,
        confidence: 0.0,
        weight,
        contribution: 0.0,
        reason,
        matched_variant: None,
    }
}

/// Builds a pattern from escaped literals. Escaped input cannot produce an invalid regex,
/// but a failure is still treated as "no match" rather than a panic.
fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(error = %e, "Skipping uncompilable skill pattern");
            None
        }
    }
}

fn has_negative_context(text: &str, phrase: &str) -> bool {
    let escaped = regex::escape(phrase);
    NEGATIVE_PATTERNS.iter().any(|template| {
        compile(&template.replace("{}", &escaped)).is_some_and(|re| re.is_match(text))
    })
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    compile(&format!(r"\b{}\b", regex::escape(phrase))).is_some_and(|re| re.is_match(text))
}

fn find_synonym(text: &str, skill: &str) -> Option<String> {
    let variants: Vec<String> = synonyms_for(skill)
        .iter()
        .map(|s| normalize_text(s))
        .filter(|s| !s.is_empty())
        .collect();
    if variants.is_empty() {
        return None;
    }

    let alternation = variants
        .iter()
        .map(|v| regex::escape(v))
        .collect::<Vec<_>>()
        .join("|");
    let re = compile(&format!(r"\b(?:{alternation})\b"))?;
    re.find(text).map(|m| m.as_str().to_string())
}

/// Best Indel similarity (0 – 100) between the shorter string and any alignment of it
/// against the longer one.
///
/// Each candidate window scores `2 × LCS / (len_short + len_window) × 100`. Windows are
/// every full-length slice of the longer string plus the partial prefixes and suffixes
/// at its edges, so a skill cut off at the start or end of the text still aligns.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let len = short.len();
    let edges = (1..len).flat_map(|n| [&long[..n], &long[long.len() - n..]]);
    let mut best = 0.0_f64;
    for window in long.windows(len).chain(edges) {
        let ratio = indel_ratio(&short, window);
        if ratio > best {
            best = ratio;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Normalized Indel similarity: 100 minus the share of chars that must be inserted or
/// deleted to turn one slice into the other.
fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    2.0 * lcs_len(a, b) as f64 / total as f64 * 100.0
}

/// Longest common subsequence length, one DP row at a time.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}
