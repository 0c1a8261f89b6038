//! Character-level classification and case folding used by the tokenizer and
//! the word hyphenator.

use unicode_segmentation::UnicodeSegmentation;

/// Letters of any script (Unicode `Alphabetic`), including accented Latin
/// and ß. Digits, punctuation and symbols are not word characters.
///
/// Combining marks are judged by the cluster they belong to, see [`is_word`].
pub fn is_word_char(c: char) -> bool {
    c.is_alphabetic()
}

/// Check if a string is non-empty and every grapheme cluster starts with a
/// word character, so decomposed text (`U` + U+0308) counts as a word.
pub fn is_word(s: &str) -> bool {
    !s.is_empty()
        && s
            .graphemes(true)
            .all(|g| g.chars().next().is_some_and(is_word_char))
}

/// `starts[k]` is true when char offset `k` of `word` falls on a grapheme
/// cluster boundary. The slice has `char_count + 1` entries.
pub fn cluster_starts(word: &str) -> Vec<bool> {
    let mut starts = vec![false; word.chars().count() + 1];
    let mut k = 0;
    for g in word.graphemes(true) {
        starts[k] = true;
        k += g.chars().count();
    }
    starts[k] = true;
    starts
}

/// Simple one-to-one lower-casing.
///
/// Characters whose lower case expands to several characters (e.g. `İ`) are
/// returned unchanged so that character offsets of the folded form line up
/// with the original word.
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Lower-case a word with [`fold_char`], preserving its character count.
pub fn fold_word(s: &str) -> String {
    s.chars().map(fold_char).collect()
}
