//! Text normalization applied before every comparison.
//!
//! Lookup sequences come back from the API while working sequences are
//! transcribed by hand, so the two sides routinely disagree on Unicode
//! composition and on invisible formatting characters pasted in by editors.
//! Both sides of every comparison go through [`normalize`] — normalizing
//! only one side is a correctness bug, and the scorer never compares raw
//! strings directly.

use unicode_normalization::UnicodeNormalization;

/// Invisible and directional formatting code points removed during
/// normalization. Kept as an explicit table keyed by code point so additions
/// are reviewable; meaningful whitespace (space, tab, newline) is never in
/// this list.
pub const INVISIBLE_CODE_POINTS: &[char] = &[
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{202A}', // left-to-right embedding
    '\u{202B}', // right-to-left embedding
    '\u{202C}', // pop directional formatting
    '\u{202D}', // left-to-right override
    '\u{202E}', // right-to-left override
    '\u{2060}', // word joiner
    '\u{FEFF}', // byte-order mark / zero-width no-break space
];

/// Canonically compose (NFC) and strip invisible formatting code points.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.nfc()
        .filter(|c| !INVISIBLE_CODE_POINTS.contains(c))
        .collect()
}

/// Normalize optional text; absent input normalizes to the empty string.
#[must_use]
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_every_listed_code_point() {
        for &c in INVISIBLE_CODE_POINTS {
            let input = format!("a{c}b");
            assert_eq!(normalize(&input), "ab", "U+{:04X} not stripped", c as u32);
        }
    }

    #[test]
    fn test_preserves_meaningful_whitespace() {
        assert_eq!(normalize("a b\tc\nd"), "a b\tc\nd");
    }

    #[test]
    fn test_nfc_composition() {
        // e + combining acute composes to the same string as precomposed é
        let decomposed = "e\u{0301}";
        let precomposed = "\u{00E9}";
        assert_eq!(normalize(decomposed), normalize(precomposed));
    }

    #[test]
    fn test_mixed_invisible_and_text() {
        assert_eq!(normalize("\u{FEFF}hello\u{200B} world\u{200D}"), "hello world");
    }

    #[test]
    fn test_normalize_opt() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("")), "");
        assert_eq!(normalize_opt(Some("x\u{200B}")), "x");
    }

    #[test]
    fn test_plain_ascii_unchanged() {
        assert_eq!(normalize("hello world"), "hello world");
    }
}
