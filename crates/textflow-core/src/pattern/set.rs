use std::collections::{HashMap, HashSet};

use crate::language::LanguageCode;
use crate::unicode::fold_word;

use super::Pattern;

/// The compiled patterns of one language.
///
/// Pattern texts are folded to lower case and grouped by character length,
/// so a scan of a padded word costs one hash probe per (offset, distinct
/// length) pair instead of one substring search per pattern. Duplicates
/// collapse into the same bucket entry.
#[derive(Debug)]
pub struct PatternSet {
    language: LanguageCode,
    patterns: Vec<Pattern>,
    /// (char length, folded texts of that length), ascending by length.
    buckets: Vec<(usize, HashSet<String>)>,
}

impl PatternSet {
    pub fn new(language: LanguageCode, patterns: Vec<Pattern>) -> Self {
        let mut by_len: HashMap<usize, HashSet<String>> = HashMap::new();
        for p in &patterns {
            let folded = fold_word(p.text.trim());
            let len = folded.chars().count();
            if len == 0 {
                continue;
            }
            by_len.entry(len).or_default().insert(folded);
        }
        let mut buckets: Vec<(usize, HashSet<String>)> = by_len.into_iter().collect();
        buckets.sort_by_key(|(len, _)| *len);

        Self {
            language,
            patterns,
            buckets,
        }
    }

    pub fn language(&self) -> &LanguageCode {
        &self.language
    }

    /// Patterns as supplied by the store, in order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of distinct, non-empty pattern texts after folding.
    pub fn distinct_count(&self) -> usize {
        self.buckets.iter().map(|(_, set)| set.len()).sum()
    }

    /// Longest pattern in characters (0 for an empty set).
    pub fn max_pattern_len(&self) -> usize {
        self.buckets.last().map(|(len, _)| *len).unwrap_or(0)
    }

    /// Call `f(start, end)` for every char span of `padded` equal to a pattern.
    ///
    /// `padded` must already be folded. Spans are reported by ascending start,
    /// then ascending length.
    pub fn for_each_match(&self, padded: &str, mut f: impl FnMut(usize, usize)) {
        // Byte offset of every char boundary, including the end.
        let mut offsets: Vec<usize> = padded.char_indices().map(|(i, _)| i).collect();
        offsets.push(padded.len());
        let char_count = offsets.len() - 1;

        for start in 0..char_count {
            for (len, set) in &self.buckets {
                let end = start + len;
                if end > char_count {
                    break;
                }
                if set.contains(&padded[offsets[start]..offsets[end]]) {
                    f(start, end);
                }
            }
        }
    }
}
