//! Years-of-experience estimate from free resume text.
//!
//! Algorithm:
//!   1. Lower-case the text.
//!   2. Collect every match of every pattern family into one candidate pool:
//!      years+months, ranges (upper bound), decimal years, integer years, bare months,
//!      spelled-out years.
//!   3. Return the maximum, rounded to 2 decimals (0.0 when the pool is empty).

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::round2;

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
];

lazy_static! {
    // "2 years 6 months" / "2 years and 6 months" / "1.5 years, 3 months"
    static ref YEARS_MONTHS_RE: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)\s*years?\s*(?:and\s+|,\s*)?(\d+)\s*months?"
    )
    .unwrap();
    // "3-5 years" / "3 – 5 years" / "3 to 5 years"
    static ref RANGE_RE: Regex =
        Regex::new(r"(\d+)\s*(?:-|–|—|to)\s*(\d+)\s*years?").unwrap();
    // "1.5 years"
    static ref DECIMAL_YEARS_RE: Regex = Regex::new(r"(\d+\.\d+)\s*years?").unwrap();
    // "3 years"; the leading guard keeps "1.5 years" from also yielding 5
    static ref INTEGER_YEARS_RE: Regex = Regex::new(r"(?:^|[^\d.])(\d+)\s*years?").unwrap();
    // "6 months"
    static ref MONTHS_RE: Regex = Regex::new(r"(?:^|[^\d.])(\d+)\s*months?").unwrap();
    // "five years"
    static ref WORD_YEARS_RE: Regex = Regex::new(&format!(
        r"\b({})\s+years?\b",
        NUMBER_WORDS
            .iter()
            .map(|(word, _)| *word)
            .collect::<Vec<_>>()
            .join("|")
    ))
    .unwrap();
}

/// Returns the largest duration mentioned in `text`, in years rounded to 2 decimals.
/// 0.0 when nothing matches.
pub fn extract_experience(text: &str) -> f64 {
    let text = text.to_lowercase();

    let candidates = years_and_months(&text)
        .chain(range_upper_bounds(&text))
        .chain(decimal_years(&text))
        .chain(integer_years(&text))
        .chain(months_only(&text))
        .chain(spelled_out_years(&text));

    let best = candidates
        .filter(|years| years.is_finite() && *years >= 0.0)
        .fold(0.0_f64, f64::max);

    round2(best)
}

fn capture_f64(caps: &regex::Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().parse::<f64>().ok()
}

fn years_and_months(text: &str) -> impl Iterator<Item = f64> + '_ {
    YEARS_MONTHS_RE.captures_iter(text).filter_map(|caps| {
        let years = capture_f64(&caps, 1)?;
        let months = capture_f64(&caps, 2)?;
        Some(years + months / 12.0)
    })
}

fn range_upper_bounds(text: &str) -> impl Iterator<Item = f64> + '_ {
    RANGE_RE
        .captures_iter(text)
        .filter_map(|caps| capture_f64(&caps, 2))
}

fn decimal_years(text: &str) -> impl Iterator<Item = f64> + '_ {
    DECIMAL_YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| capture_f64(&caps, 1))
}

fn integer_years(text: &str) -> impl Iterator<Item = f64> + '_ {
    INTEGER_YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| capture_f64(&caps, 1))
}

fn months_only(text: &str) -> impl Iterator<Item = f64> + '_ {
    MONTHS_RE
        .captures_iter(text)
        .filter_map(|caps| capture_f64(&caps, 1).map(|months| months / 12.0))
}

fn spelled_out_years(text: &str) -> impl Iterator<Item = f64> + '_ {
    WORD_YEARS_RE.captures_iter(text).filter_map(|caps| {
        let word = caps.get(1)?.as_str();
        NUMBER_WORDS
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, n)| f64::from(*n))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_maximum_of_all_mentions() {
        assert_eq!(
            extract_experience("I have 3 years of experience. Also 10 years elsewhere."),
            10.0
        );
    }

    #[test]
    fn test_simple_years() {
        assert_eq!(extract_experience("I have 3 years of experience"), 3.0);
        assert_eq!(extract_experience("1 year at Acme"), 1.0);
    }

    #[test]
    fn test_years_and_months() {
        assert_eq!(
            extract_experience("Worked for 2 years 6 months in data analytics"),
            2.5
        );
        assert_eq!(extract_experience("4 years and 3 months"), 4.25);
    }

    #[test]
    fn test_decimal_years_not_split() {
        assert_eq!(extract_experience("Experience: 1.5 years in Python"), 1.5);
    }

    #[test]
    fn test_range_takes_upper_bound() {
        assert_eq!(extract_experience("Total experience is 3-5 years"), 5.0);
        assert_eq!(extract_experience("between 2 to 4 years"), 4.0);
        assert_eq!(extract_experience("3 – 6 years"), 6.0);
    }

    #[test]
    fn test_spelled_out_years() {
        assert_eq!(
            extract_experience("I have six years experience in software development"),
            6.0
        );
        assert_eq!(extract_experience("Fourteen years of teaching"), 14.0);
    }

    #[test]
    fn test_spelled_out_requires_word_boundary() {
        // "someone years" must not read as "one years"
        assert_eq!(extract_experience("someone years ago"), 0.0);
    }

    #[test]
    fn test_months_only() {
        assert_eq!(extract_experience("Worked for 8 months as intern"), 0.67);
        assert_eq!(extract_experience("6 months"), 0.5);
    }

    #[test]
    fn test_no_mention_is_zero() {
        assert_eq!(extract_experience("No experience mentioned here"), 0.0);
        assert_eq!(extract_experience(""), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_experience("7 YEARS in Finance"), 7.0);
    }

    #[test]
    fn test_deterministic() {
        let text = "2 years 6 months at A, 3-5 years overall, 18 months contract";
        let first = extract_experience(text);
        for _ in 0..5 {
            assert_eq!(extract_experience(text).to_bits(), first.to_bits());
        }
        assert_eq!(first, 5.0);
    }
}
