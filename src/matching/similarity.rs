//! Bounded string similarity used by the aligner.
//!
//! Whole-segment equality uses a Jaro-Winkler ratio in `[0, 1]`; containment
//! checks try an exact substring test on the normalized strings first and
//! only fall back to the ratio when that fails, since most containment hits
//! in real data are exact once invisible characters are gone.

use thiserror::Error;

use crate::matching::normalize::normalize;

/// Default ratio threshold for whole-segment similarity.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Default ratio threshold for containment fallback.
pub const DEFAULT_CONTAINMENT_THRESHOLD: f64 = 0.98;

/// Winkler prefix scaling factor.
const WINKLER_PREFIX_SCALE: f64 = 0.1;

/// Maximum common-prefix length credited by the Winkler adjustment.
const WINKLER_MAX_PREFIX: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("similarity threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
}

/// Reject thresholds outside `(0, 1]` at the configuration boundary, before
/// any scan runs.
pub fn validate_threshold(threshold: f64) -> Result<f64, ThresholdError> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(ThresholdError::InvalidThreshold(threshold))
    }
}

/// Jaro similarity between two raw strings, in `[0, 1]`.
///
/// Operates on char sequences, not bytes, so multi-byte scripts score the
/// same as ASCII.
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && *ca == b[j] {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Transpositions: matched chars compared in order
    let mut transpositions = 0usize;
    let mut j = 0usize;
    for (i, matched) in a_matched.iter().enumerate() {
        if !matched {
            continue;
        }
        while !b_matched[j] {
            j += 1;
        }
        if a[i] != b[j] {
            transpositions += 1;
        }
        j += 1;
    }

    let m = count_to_f64(matches);
    let t = count_to_f64(transpositions) / 2.0;
    (m / count_to_f64(a.len()) + m / count_to_f64(b.len()) + (m - t) / m) / 3.0
}

/// Jaro-Winkler similarity: Jaro boosted for a shared prefix.
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    let jaro = jaro_similarity(a, b);

    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_MAX_PREFIX)
        .take_while(|(ca, cb)| ca == cb)
        .count();

    jaro + count_to_f64(prefix) * WINKLER_PREFIX_SCALE * (1.0 - jaro)
}

/// Whole-segment similarity test on normalized inputs.
///
/// Both inputs empty after normalization are vacuously similar; exactly one
/// empty is never similar.
#[must_use]
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    let a = normalize(a);
    let b = normalize(b);

    if a.is_empty() && b.is_empty() {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }

    jaro_winkler_similarity(&a, &b) >= threshold
}

/// Containment test: `needle` appears inside `haystack`.
///
/// Exact substring on normalized strings first; whole-string similarity
/// fallback second, so the distance computation is only paid when the cheap
/// check fails.
#[must_use]
pub fn contains_similar(needle: &str, haystack: &str, threshold: f64) -> bool {
    let needle = normalize(needle);
    let haystack = normalize(haystack);

    if needle.is_empty() && haystack.is_empty() {
        return true;
    }
    if needle.is_empty() || haystack.is_empty() {
        return false;
    }

    if haystack.contains(&needle) {
        return true;
    }

    jaro_winkler_similarity(&needle, &haystack) >= threshold
}

/// Safely convert usize to f64 for ratio calculations.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_threshold() {
        assert_eq!(validate_threshold(0.95), Ok(0.95));
        assert_eq!(validate_threshold(1.0), Ok(1.0));
        assert!(validate_threshold(0.0).is_err());
        assert!(validate_threshold(-0.5).is_err());
        assert!(validate_threshold(1.5).is_err());
    }

    #[test]
    fn test_jaro_identical() {
        assert!((jaro_similarity("martha", "martha") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_jaro_known_pair() {
        // Classic MARTHA/MARHTA example: jaro = 0.944..., winkler = 0.961...
        let jaro = jaro_similarity("martha", "marhta");
        assert!((jaro - 0.944_444).abs() < 1e-3, "jaro = {jaro}");
        let jw = jaro_winkler_similarity("martha", "marhta");
        assert!((jw - 0.961_111).abs() < 1e-3, "jw = {jw}");
    }

    #[test]
    fn test_jaro_disjoint() {
        assert!((jaro_similarity("abc", "xyz") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_similar_reflexive() {
        for s in ["hello world", "x", "བོད་ཡིག", ""] {
            assert!(is_similar(s, s, 1.0));
        }
    }

    #[test]
    fn test_is_similar_symmetric() {
        let pairs = [("hello world", "hello wo"), ("abc", "abd"), ("", "x")];
        for (a, b) in pairs {
            assert_eq!(
                is_similar(a, b, DEFAULT_SIMILARITY_THRESHOLD),
                is_similar(b, a, DEFAULT_SIMILARITY_THRESHOLD)
            );
        }
    }

    #[test]
    fn test_is_similar_empty_cases() {
        assert!(is_similar("", "", DEFAULT_SIMILARITY_THRESHOLD));
        assert!(!is_similar("", "x", DEFAULT_SIMILARITY_THRESHOLD));
        assert!(!is_similar("x", "", DEFAULT_SIMILARITY_THRESHOLD));
    }

    #[test]
    fn test_is_similar_truncation_rejected() {
        assert!(!is_similar("hello world", "hello wo", 0.95));
    }

    #[test]
    fn test_is_similar_ignores_invisible_characters() {
        assert!(is_similar("hello\u{200B} world", "hello world", 1.0));
    }

    #[test]
    fn test_contains_similar_exact_substring() {
        assert!(contains_similar(
            "hello world",
            "Say hello world to everyone",
            DEFAULT_SIMILARITY_THRESHOLD
        ));
    }

    #[test]
    fn test_contains_similar_fuzzy_fallback() {
        assert!(contains_similar(
            "hello world to everyone",
            "Say hello world to everyones",
            0.95
        ));
    }

    #[test]
    fn test_contains_similar_not_present() {
        assert!(!contains_similar(
            "goodbye",
            "Say hello world to everyone",
            0.95
        ));
    }

    #[test]
    fn test_contains_similar_empty_cases() {
        assert!(contains_similar("", "", DEFAULT_CONTAINMENT_THRESHOLD));
        assert!(!contains_similar("", "text", DEFAULT_CONTAINMENT_THRESHOLD));
        assert!(!contains_similar("text", "", DEFAULT_CONTAINMENT_THRESHOLD));
    }

    #[test]
    fn test_contains_similar_normalized_substring() {
        // Needle differs from the haystack slice only by a BOM and composition
        assert!(contains_similar(
            "caf\u{0065}\u{0301}",
            "le \u{FEFF}caf\u{00E9} est ouvert",
            DEFAULT_CONTAINMENT_THRESHOLD
        ));
    }
}
