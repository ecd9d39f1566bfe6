//! Static lookup data for the skill matcher. Built once on first use, read-only afterwards.

use std::collections::HashMap;

use lazy_static::lazy_static;

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Canonical skill (lower-case) → alternative spellings recruiters see in resumes.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("machine learning", &["ml", "machine-learning", "ml algorithms"]),
    (
        "natural language processing",
        &["nlp", "text mining", "language models"],
    ),
    ("deep learning", &["dl", "neural networks"]),
    ("javascript", &["js", "java script"]),
    ("power bi", &["powerbi", "power-bi"]),
    ("data analysis", &["data analytics", "analysis of data"]),
    ("excel", &["msexcel", "advanced excel"]),
    ("sql", &["mysql", "postgres", "structured query language"]),
];

/// Skills hiring teams treat as critical. Everything else weighs `DEFAULT_WEIGHT`.
const WEIGHTS: &[(&str, f64)] = &[
    ("machine learning", 1.5),
    ("deep learning", 1.4),
    ("natural language processing", 1.4),
    ("sql", 1.2),
    ("power bi", 1.2),
];

lazy_static! {
    static ref SYNONYM_MAP: HashMap<&'static str, &'static [&'static str]> =
        SYNONYMS.iter().copied().collect();
    static ref WEIGHT_MAP: HashMap<&'static str, f64> = WEIGHTS.iter().copied().collect();
}

/// Synonyms for a lower-cased skill; empty when the skill has none.
pub fn synonyms_for(skill: &str) -> &'static [&'static str] {
    SYNONYM_MAP.get(skill).copied().unwrap_or(&[])
}

pub fn weight_for(skill: &str) -> f64 {
    WEIGHT_MAP.get(skill).copied().unwrap_or(DEFAULT_WEIGHT)
}
