//! Text normalization shared by the skill matcher and the similarity scorer.

/// Lower-cases, turns every non-word character into a space and collapses whitespace.
/// Word characters are Unicode alphanumerics and `_`.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Returns at most the first `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Rounds half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_collapses() {
        assert_eq!(
            normalize_text("  Python,   SQL & Power-BI!\n\tML/AI "),
            "python sql power bi ml ai"
        );
    }

    #[test]
    fn test_normalize_keeps_underscore_and_digits() {
        assert_eq!(normalize_text("snake_case 3.5 yrs"), "snake_case 3 5 yrs");
    }

    #[test]
    fn test_normalize_keeps_unicode_letters() {
        assert_eq!(normalize_text("Résumé: Zürich"), "résumé zürich");
    }

    #[test]
    fn test_normalize_empty_and_punctuation_only() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("!!! --- ..."), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(76.0), 76.0);
        assert_eq!(round2(2.499_999), 2.5);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }
}
