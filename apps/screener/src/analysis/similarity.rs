//! JD ↔ resume similarity over hashed unigram + bigram features.
//!
//! Algorithm:
//! 1. Normalize both texts; either under 10 chars → (0, 0).
//! 2. Truncate the resume to 12 000 chars.
//! 3. Tokens = words of ≥ 2 chars; features = tokens + adjacent token pairs.
//! 4. Hash each feature into 2^18 buckets (SipHash-1-3, fixed keys), weight = 1 + ln(count).
//! 5. L2-normalize; cosine = dot product, clamped to [0, 1].
//!
//! No document-frequency filtering: with two documents every shared term would be dropped.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use tracing::warn;

use super::normalize::{normalize_text, round2, truncate_chars};

pub const N_FEATURES: u64 = 1 << 18;
pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_RESUME_CHARS: usize = 12_000;

/// Changing either key changes every score.
const HASH_KEY_0: u64 = 0x5eed_0f_c0ff_ee42;
const HASH_KEY_1: u64 = 0x7e57_ab1e_d00d_f00d;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// 0.0 – 1.0
    pub raw_similarity: f64,
    /// 0 – 100, 2 decimals
    pub scaled_score: f64,
}

/// Bucket → weight, ordered by bucket.
type SparseVector = BTreeMap<u64, f64>;

pub fn jd_resume_similarity(job_description: &str, resume_text: &str) -> SimilarityResult {
    let job = normalize_text(job_description);
    let resume = normalize_text(resume_text);

    if job.chars().count() < MIN_TEXT_CHARS || resume.chars().count() < MIN_TEXT_CHARS {
        return SimilarityResult::default();
    }
    let resume = truncate_chars(&resume, MAX_RESUME_CHARS);

    let raw = cosine(&vectorize(&job), &vectorize(resume));
    if !raw.is_finite() {
        warn!(raw, "Non-finite similarity; reporting zero");
        return SimilarityResult::default();
    }

    let raw = raw.clamp(0.0, 1.0);
    SimilarityResult {
        raw_similarity: raw,
        scaled_score: round2(raw * 100.0),
    }
}

fn bucket(feature: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
    feature.hash(&mut hasher);
    hasher.finish() % N_FEATURES
}

fn vectorize(text: &str) -> SparseVector {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2)
        .collect();

    let mut counts: BTreeMap<u64, u32> = BTreeMap::new();
    for token in &tokens {
        *counts.entry(bucket(token)).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        let bigram = format!("{} {}", pair[0], pair[1]);
        *counts.entry(bucket(&bigram)).or_insert(0) += 1;
    }

    let mut vector: SparseVector = counts
        .into_iter()
        .map(|(idx, count)| (idx, 1.0 + f64::from(count).ln()))
        .collect();

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

/// Both inputs are unit length (or empty), so the dot product is the cosine.
fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(idx, wa)| large.get(idx).map(|wb| wa * wb))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "We need a data analyst with SQL, Excel and Power BI for reporting dashboards.";

    #[test]
    fn test_short_text_guard_is_exact_zero() {
        let result = jd_resume_similarity("short", "short");
        assert_eq!(result.raw_similarity, 0.0);
        assert_eq!(result.scaled_score, 0.0);
    }

    #[test]
    fn test_guard_applies_to_either_side() {
        assert_eq!(jd_resume_similarity(JD, "!!"), SimilarityResult::default());
        assert_eq!(jd_resume_similarity("", JD), SimilarityResult::default());
    }

    #[test]
    fn test_identical_texts_score_full() {
        let result = jd_resume_similarity(JD, JD);
        assert!((result.raw_similarity - 1.0).abs() < 1e-9);
        assert_eq!(result.scaled_score, 100.0);
    }

    #[test]
    fn test_normalization_makes_case_and_punctuation_irrelevant() {
        let a = jd_resume_similarity(JD, "DATA ANALYST; sql/excel -- power bi dashboards!");
        let b = jd_resume_similarity(JD, "data analyst sql excel power bi dashboards");
        assert_eq!(a, b);
    }

    #[test]
    fn test_related_scores_higher_than_unrelated() {
        let related = jd_resume_similarity(
            JD,
            "Data analyst building SQL queries and Power BI dashboards for monthly reporting.",
        );
        let unrelated = jd_resume_similarity(
            JD,
            "Pastry chef experienced in laminated doughs, croissants and wedding cakes.",
        );
        assert!(related.scaled_score > unrelated.scaled_score);
        assert!(related.scaled_score > 5.0);
    }

    #[test]
    fn test_repeated_terms_are_log_scaled() {
        let once = jd_resume_similarity(JD, "sql developer and analyst");
        let spam = jd_resume_similarity(JD, &"sql ".repeat(500));
        assert!(once.scaled_score > spam.scaled_score);
    }

    #[test]
    fn test_range_and_determinism() {
        let resume = "Analyst, 4 years of SQL and Excel. Built Power BI reporting.";
        let first = jd_resume_similarity(JD, resume);
        assert!((0.0..=1.0).contains(&first.raw_similarity));
        assert!((0.0..=100.0).contains(&first.scaled_score));
        for _ in 0..5 {
            let again = jd_resume_similarity(JD, resume);
            assert_eq!(again.raw_similarity.to_bits(), first.raw_similarity.to_bits());
        }
    }

    #[test]
    fn test_single_char_tokens_ignored() {
        assert_eq!(vectorize("a b c d e f g h"), SparseVector::new());
    }
}
