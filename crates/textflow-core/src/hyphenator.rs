//! Break-point search for a single word.
//!
//! The word is folded to lower case and padded with the boundary marker
//! (`_word_`) so patterns can anchor at either end. Every pattern occurrence
//! marks the offset right after it; marks inside the left/right margins are
//! dropped. Markers are then inserted into the original-case word.

use std::borrow::Cow;

use crate::pattern::PatternSet;
use crate::settings::HyphenationSettings;
use crate::unicode::{cluster_starts, fold_char};

/// Eligible break offsets of `word`, ascending and deduplicated.
///
/// Offsets count characters of the unpadded word: offset `k` means "between
/// the k-th and (k+1)-th character". Words shorter than `min_word_length`
/// yield no offsets without scanning. Offsets inside a grapheme cluster
/// (before a combining mark) are never returned.
pub fn break_points(word: &str, patterns: &PatternSet, params: &HyphenationSettings) -> Vec<usize> {
    let char_count = word.chars().count();
    if char_count < params.min_word_length || patterns.is_empty() {
        return Vec::new();
    }

    let mut padded = String::with_capacity(word.len() + 2 * params.boundary_marker.len_utf8());
    padded.push(params.boundary_marker);
    padded.extend(word.chars().map(fold_char));
    padded.push(params.boundary_marker);

    // marks[k]: break allowed after k characters of the unpadded word.
    let mut marks = vec![false; char_count + 1];
    patterns.for_each_match(&padded, |_start, end| {
        // `end` is exclusive in padded chars; the leading pad shifts by one.
        let offset = end - 1;
        if offset <= char_count {
            marks[offset] = true;
        }
    });

    let lo = params.min_left_chars.max(1);
    let hi = char_count
        .saturating_sub(params.min_right_chars)
        .min(char_count.saturating_sub(1));
    if lo > hi {
        return Vec::new();
    }
    let starts = cluster_starts(word);
    (lo..=hi).filter(|&k| marks[k] && starts[k]).collect()
}

/// Insert `marker` into `word` after each character count listed in `offsets`.
///
/// `offsets` must be ascending; offsets beyond the word are ignored.
pub fn insert_markers(word: &str, offsets: &[usize], marker: &str) -> String {
    let mut out = String::with_capacity(word.len() + offsets.len() * marker.len());
    let mut pending = offsets.iter().copied().peekable();
    for (i, c) in word.chars().enumerate() {
        out.push(c);
        while let Some(&next) = pending.peek() {
            if next > i + 1 {
                break;
            }
            if next == i + 1 {
                out.push_str(marker);
            }
            pending.next();
        }
    }
    out
}

/// Hyphenate a single word (letters only, no markup, no whitespace).
///
/// Returns the input borrowed when no break point applies.
pub fn hyphenate_word<'a>(
    word: &'a str,
    patterns: &PatternSet,
    params: &HyphenationSettings,
    marker: &str,
) -> Cow<'a, str> {
    let offsets = break_points(word, patterns, params);
    if offsets.is_empty() {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(insert_markers(word, &offsets, marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageCode;
    use crate::pattern::Pattern;

    const MARK: &str = "·";

    fn params() -> HyphenationSettings {
        HyphenationSettings {
            min_word_length: 5,
            min_left_chars: 2,
            min_right_chars: 2,
            boundary_marker: '_',
        }
    }

    fn set(texts: &[&str]) -> PatternSet {
        let patterns = texts.iter().map(|t| Pattern::new("de", *t)).collect();
        PatternSet::new(LanguageCode::new("de"), patterns)
    }

    fn german() -> PatternSet {
        set(&["kon", "fig", "ent", "wick", "lung"])
    }

    fn hy(word: &str, patterns: &PatternSet) -> String {
        hyphenate_word(word, patterns, &params(), MARK).into_owned()
    }

    #[test]
    fn test_single_pattern_marks_after_match() {
        assert_eq!(hy("Konfiguration", &set(&["kon"])), "Kon·figuration");
    }

    #[test]
    fn test_full_set_konfiguration() {
        let out = hy("Konfiguration", &german());
        assert!(out.starts_with("Kon·"));
        assert_eq!(out, "Kon·fig·uration");
    }

    #[test]
    fn test_no_break_before_combining_mark() {
        let word = "Abu\u{308}berlang";
        assert_eq!(hy(word, &set(&["abu"])), word);
        assert_eq!(
            hy(word, &set(&["abu\u{308}"])),
            "Abu\u{308}·berlang"
        );
    }

    #[test]
    fn test_zero_length_floor() {
        let lax = HyphenationSettings {
            min_word_length: 0,
            min_left_chars: 0,
            min_right_chars: 0,
            ..params()
        };
        assert!(break_points("", &german(), &lax).is_empty());
        assert!(break_points("k", &set(&["k"]), &lax).is_empty());
    }

    #[test]
    fn test_entwicklung() {
        // "lung" ends at the word end, which the right margin excludes.
        assert_eq!(hy("Entwicklung", &german()), "Ent·wick·lung");
    }

    #[test]
    fn test_short_word_is_borrowed() {
        let p = german();
        let out = hyphenate_word("Konf", &p, &params(), MARK);
        assert!(matches!(out, Cow::Borrowed("Konf")));
    }

    #[test]
    fn test_no_match_is_borrowed() {
        let p = german();
        let out = hyphenate_word("Haus", &p, &params(), MARK);
        assert!(matches!(out, Cow::Borrowed(_)));
        let out = hyphenate_word("Bahnhof", &p, &params(), MARK);
        assert!(matches!(out, Cow::Borrowed("Bahnhof")));
    }

    #[test]
    fn test_margins() {
        // Marks land on 1, 2, 6, 7 and 8; only 2..=6 survive the 2/2 margins.
        let p = set(&["a", "ab", "ef", "fg", "gh"]);
        assert_eq!(break_points("abcdefgh", &p, &params()), vec![2, 6]);

        let wide = HyphenationSettings {
            min_left_chars: 3,
            min_right_chars: 3,
            ..params()
        };
        assert!(break_points("abcdefgh", &p, &wide).is_empty());
    }

    #[test]
    fn test_duplicate_patterns_are_idempotent() {
        let once = set(&["kon"]);
        let many = set(&["kon", "kon", "KON", "on"]);
        // "on" ends at the same offset as "kon".
        assert_eq!(
            break_points("Konfiguration", &once, &params()),
            break_points("Konfiguration", &many, &params())
        );
    }

    #[test]
    fn test_boundary_anchor() {
        let p = set(&["_ko", "ion_"]);
        // "_ko" marks offset 2; "ion_" ends past the word and marks nothing.
        assert_eq!(break_points("Konfiguration", &p, &params()), vec![2]);
    }

    #[test]
    fn test_case_preserved() {
        let p = set(&["pro", "gram", "mie"]);
        let upper = hy("PROGRAMMIERUNG", &p);
        let mixed = hy("Programmierung", &p);
        assert_eq!(upper, "PRO·GRAM·MIE·RUNG");
        assert_eq!(mixed, "Pro·gram·mie·rung");
        assert_eq!(upper.to_lowercase(), mixed.to_lowercase());
    }

    #[test]
    fn test_multibyte_word() {
        let p = set(&["über", "grö"]);
        assert_eq!(hy("Übergröße", &p), "Über·grö·ße");
    }

    #[test]
    fn test_insert_markers_ignores_out_of_range() {
        assert_eq!(insert_markers("abcdef", &[2, 4, 10], "-"), "ab-cd-ef");
        assert_eq!(insert_markers("abc", &[], "-"), "abc");
    }

    #[test]
    fn test_debug_marker_same_offsets() {
        let p = german();
        let soft = hyphenate_word("Entwicklung", &p, &params(), "\u{AD}");
        let obvious = hyphenate_word("Entwicklung", &p, &params(), "▼");
        assert_eq!(obvious, "Ent▼wick▼lung");
        assert_eq!(soft.replace('\u{AD}', "▼"), obvious);
    }
}
